//! Lectern DOM
//!
//! Memory-efficient arena document tree plus the node-handle abstraction
//! the reading engine works through. The tree being enhanced is owned by
//! the host environment; the engine only keeps its own bookkeeping about
//! nodes it has already processed. Hosts with their own document
//! representation implement [`DocumentTree`]; the arena [`Tree`] in this
//! crate is the reference implementation.

mod geometry;
mod handle;
mod node;
mod observer;
mod tree;

pub use geometry::Rect;
pub use handle::DocumentTree;
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use observer::{MutationBatch, MutationLog};
pub use tree::{Children, Descendants, Tree};

/// Node identifier (index into the arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
