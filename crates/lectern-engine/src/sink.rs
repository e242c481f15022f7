//! Applied-ruleset sink
//!
//! The engine writes synthesized CSS into a single application surface
//! with last-write-wins semantics: each apply fully replaces the
//! previous text, never patches it.

/// Where synthesized rulesets go
pub trait StyleSink {
    /// Replace the currently applied ruleset text
    fn apply(&mut self, css: &str);
}

/// In-memory sink holding the currently applied text
#[derive(Debug, Default)]
pub struct StyleBuffer {
    current: String,
    applications: usize,
}

impl StyleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently applied ruleset text
    pub fn css(&self) -> &str {
        &self.current
    }

    /// How many times a ruleset has been applied
    pub fn applications(&self) -> usize {
        self.applications
    }
}

impl StyleSink for StyleBuffer {
    fn apply(&mut self, css: &str) {
        self.current.clear();
        self.current.push_str(css);
        self.applications += 1;
    }
}
