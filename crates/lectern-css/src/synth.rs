//! Style synthesis
//!
//! Pure settings -> ruleset mapping. The caller owns application (a
//! single last-write-wins surface); this module only produces the text.
//! Every preference maps to exactly one rule at `!important` priority so
//! the synthesized ruleset wins over the host document's own styling.
//! Pixel fields carry explicit units; line-height, opacity and
//! font-weight stay unitless.

use std::fmt;

use crate::settings::ReaderSettings;

/// Class the engine adds to nodes whose visible flag was cleared
pub const HIDDEN_CLASS: &str = "lectern-hidden";

/// Class the engine adds to the located content region
pub const CONTENT_REGION_CLASS: &str = "lectern-content-area";

/// Generated presentation ruleset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    css: String,
}

impl Ruleset {
    /// The ruleset as CSS text
    pub fn as_css(&self) -> &str {
        &self.css
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css)
    }
}

/// Synthesize the full replacement ruleset for one settings snapshot.
pub fn synthesize(settings: &ReaderSettings) -> Ruleset {
    let mut css = format!(
        r#".{hidden} {{
    display: none !important;
}}

body {{
    font-family: {font_family} !important;
    font-size: {font_size}px !important;
    font-weight: {font_weight} !important;
    letter-spacing: {letter_spacing}px !important;
    word-spacing: {word_spacing}px !important;
    line-height: {line_height} !important;
    background-color: {background_color} !important;
    color: {text_color} !important;
    opacity: {opacity} !important;
}}

.{content} {{
    max-width: {max_width}px !important;
    margin: 0 auto !important;
    padding-left: {left_margin}px !important;
    padding-right: {right_margin}px !important;
    text-align: {content_align} !important;
}}

p {{
    margin-bottom: {paragraph_spacing}px !important;
}}

a {{
    color: {link_color} !important;
}}

::selection {{
    background-color: {selection_color};
}}
"#,
        hidden = HIDDEN_CLASS,
        content = CONTENT_REGION_CLASS,
        font_family = settings.font_family,
        font_size = settings.font_size,
        font_weight = settings.font_weight,
        letter_spacing = settings.letter_spacing,
        word_spacing = settings.word_spacing,
        line_height = settings.line_height,
        background_color = settings.background_color,
        text_color = settings.text_color,
        opacity = settings.opacity,
        max_width = settings.max_width,
        left_margin = settings.left_margin,
        right_margin = settings.right_margin,
        content_align = settings.content_align.css_value(),
        paragraph_spacing = settings.paragraph_spacing,
        link_color = settings.link_color,
        selection_color = settings.selection_color,
    );

    if settings.dark_mode {
        css.push_str(
            r#"
html {
    filter: invert(1) hue-rotate(180deg) !important;
}

img, video, iframe, svg {
    filter: invert(1) hue-rotate(180deg) !important;
}
"#,
        );
    }

    if settings.eye_care_mode {
        css.push_str(
            r#"
html {
    filter: sepia(10%) saturate(120%) brightness(110%) !important;
}
"#,
        );
    }

    if settings.focus_mode {
        css.push_str(
            r#"
body {
    background-color: #000000 !important;
}

body * {
    max-width: none !important;
}
"#,
        );
    }

    tracing::trace!(bytes = css.len(), "ruleset synthesized");
    Ruleset { css }
}
