//! Lectern HTML
//!
//! Parses an HTML/XHTML string into the arena tree from `lectern-dom`.
//! Hosts embedding the engine against a live document do not need this
//! crate; it exists for pipelines (and tests) that start from markup.

mod parser;

pub use lectern_dom::{DocumentTree, NodeId, Tree};
pub use parser::{ParseError, parse};
