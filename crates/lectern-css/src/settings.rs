//! Reader settings
//!
//! One flat snapshot of every preference the synthesizer maps to rules.
//! The snapshot is immutable per synthesis call; the persisted form is an
//! opaque blob owned by an external store. Field names serialize in
//! camelCase for compatibility with previously stored records, and the
//! struct-level serde default means a blob missing a field deserializes
//! with that field's documented default rather than failing the record.

use serde::{Deserialize, Serialize};

/// Reader preference snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReaderSettings {
    // Typography
    pub font_family: String,
    /// Pixels
    pub font_size: u32,
    pub font_weight: u16,
    /// Pixels
    pub letter_spacing: f32,
    /// Pixels
    pub word_spacing: f32,
    /// Unitless ratio
    pub line_height: f32,
    /// Pixels
    pub paragraph_spacing: u32,

    // Colors
    pub background_color: String,
    pub text_color: String,
    pub link_color: String,
    pub selection_color: String,
    /// Unitless, 0.0..=1.0
    pub opacity: f32,

    // Layout
    /// Pixels
    pub max_width: u32,
    pub content_align: ContentAlign,
    /// Pixels
    pub left_margin: u32,
    /// Pixels
    pub right_margin: u32,

    // Reading modes
    pub dark_mode: bool,
    pub eye_care_mode: bool,
    pub focus_mode: bool,
    pub auto_night_mode: bool,

    // Feature toggles
    pub enable_ad_block: bool,
    pub enable_lazy_load: bool,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            font_family: "system-ui, -apple-system, sans-serif".to_string(),
            font_size: 16,
            font_weight: 400,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            line_height: 1.6,
            paragraph_spacing: 16,
            background_color: "#ffffff".to_string(),
            text_color: "#333333".to_string(),
            link_color: "#0066cc".to_string(),
            selection_color: "#b3d4fc".to_string(),
            opacity: 1.0,
            max_width: 800,
            content_align: ContentAlign::Center,
            left_margin: 20,
            right_margin: 20,
            dark_mode: false,
            eye_care_mode: false,
            focus_mode: false,
            auto_night_mode: false,
            enable_ad_block: true,
            enable_lazy_load: true,
        }
    }
}

/// Text alignment of the content region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentAlign {
    Left,
    #[default]
    Center,
    Right,
    Justify,
}

impl ContentAlign {
    pub fn css_value(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

/// Whether auto-night mode considers the given local hour to be night.
/// Night runs from 18:00 through 05:59.
pub fn auto_night_active(hour: u8) -> bool {
    hour >= 18 || hour < 6
}
