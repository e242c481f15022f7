//! Mutation notifications
//!
//! Tree changes are delivered to subscribers as batches on a single
//! logical thread: the host (or the arena [`Tree`](crate::Tree) itself)
//! records added nodes into a [`MutationLog`], and whoever drains it
//! receives one [`MutationBatch`] per logical tree event. There is no
//! callback reentrancy; cancellation is simply dropping the log.

use crate::NodeId;

/// One batched tree-change notification
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// Nodes attached since the previous batch, in arrival order
    pub added: Vec<NodeId>,
}

/// Accumulates added nodes between deliveries
#[derive(Debug, Default)]
pub struct MutationLog {
    added: Vec<NodeId>,
}

impl MutationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly attached node
    pub fn record_added(&mut self, id: NodeId) {
        self.added.push(id);
    }

    /// Whether anything has been recorded since the last batch
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }

    /// Drain the log into a batch; `None` when nothing changed
    pub fn take_batch(&mut self) -> Option<MutationBatch> {
        if self.added.is_empty() {
            return None;
        }
        Some(MutationBatch {
            added: std::mem::take(&mut self.added),
        })
    }
}
