//! Lectern Content
//!
//! Locates the primary reading region of a document by scoring every
//! paragraph-bearing container. The scorer is a deliberately simple
//! heuristic, not an extraction oracle: the guaranteed properties are the
//! documented formula and deterministic, document-order-stable selection.

mod locate;
mod score;

pub use locate::{ScoredCandidate, candidates, locate};
pub use score::score;
