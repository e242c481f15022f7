//! Lectern CSS
//!
//! Reader preferences and the style synthesizer: a pure mapping from a
//! settings snapshot to the presentation ruleset applied over the host
//! document. Synthesis is deterministic; the same snapshot always yields
//! byte-identical output, so re-applying after a no-op edit is harmless.

mod settings;
mod synth;

pub use settings::{ContentAlign, ReaderSettings, auto_night_active};
pub use synth::{CONTENT_REGION_CLASS, HIDDEN_CLASS, Ruleset, synthesize};
