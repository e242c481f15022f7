//! Arena document tree
//!
//! Nodes live in a flat arena and reference each other by [`NodeId`].
//! The tree is the reference implementation of [`DocumentTree`]; it also
//! carries an optional mutation log so hosts can drain batched change
//! notifications after the initial build.

use crate::geometry::Rect;
use crate::handle::DocumentTree;
use crate::node::{Node, NodeData};
use crate::observer::{MutationBatch, MutationLog};
use crate::NodeId;

/// Arena-based document tree
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    log: Option<MutationLog>,
}

impl Tree {
    /// Create a tree containing only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            log: None,
        }
    }

    /// Root node ID
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous position first. Recorded in the mutation log when one is
    /// attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            tracing::warn!(?parent, ?child, "ignoring invalid append");
            return;
        }
        self.detach(child);

        let prev_last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = Some(parent);
            node.prev_sibling = prev_last;
        }
        if let Some(prev) = prev_last {
            self.nodes[prev.index()].next_sibling = Some(child);
        } else {
            self.nodes[parent.index()].first_child = Some(child);
        }
        self.nodes[parent.index()].last_child = Some(child);

        if let Some(log) = self.log.as_mut() {
            log.record_added(child);
        }
    }

    /// Unlink a node from its parent and siblings. The node (and its
    /// subtree) stays in the arena but is no longer attached.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if parent.is_none() {
            return;
        }

        if let Some(prev) = prev {
            self.nodes[prev.index()].next_sibling = next;
        } else if let Some(parent) = parent {
            self.nodes[parent.index()].first_child = next;
        }
        if let Some(next) = next {
            self.nodes[next.index()].prev_sibling = prev;
        } else if let Some(parent) = parent {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        tracing::trace!(?id, "node detached");
    }

    /// Iterate the children of a node in document order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).and_then(|n| n.first_child),
        }
    }

    /// Iterate a node and its descendants, pre-order (document order)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.get(id).map(|_| id),
        }
    }

    /// Record host geometry for an element
    pub fn set_bounds(&mut self, id: NodeId, rect: Rect) {
        if let Some(el) = self.get_mut(id).and_then(|n| n.as_element_mut()) {
            el.bounds = Some(rect);
        }
    }

    /// Start recording attached nodes into a mutation log
    pub fn enable_mutation_log(&mut self) {
        if self.log.is_none() {
            self.log = Some(MutationLog::new());
        }
    }

    /// Drain recorded mutations; `None` when nothing changed (or no log)
    pub fn take_mutations(&mut self) -> Option<MutationBatch> {
        self.log.as_mut()?.take_batch()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree for Tree {
    fn root(&self) -> NodeId {
        Tree::root(self)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }

    fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.name.as_str())
    }

    fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.get_mut(id).and_then(Node::as_element_mut) {
            el.set_attr(name, value);
        }
    }

    fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.get_mut(id).and_then(Node::as_element_mut) {
            el.remove_attr(name);
        }
    }

    fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for n in self.descendants(id) {
            if let Some(text) = self.get(n).and_then(Node::as_text) {
                out.push_str(text);
            }
        }
        out
    }

    fn is_visible(&self, id: NodeId) -> bool {
        self.get(id).is_none_or(|n| n.visible)
    }

    fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.get_mut(id) {
            node.visible = visible;
        }
    }

    fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.get(id)?.as_element()?.bounds
    }

    fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == NodeId::ROOT {
                return true;
            }
            match self.get(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

/// Iterator over the children of a node
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Pre-order iterator over a node and its descendants
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a Tree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.advance(current);
        Some(current)
    }
}

impl Descendants<'_> {
    fn advance(&self, current: NodeId) -> Option<NodeId> {
        let node = self.tree.get(current)?;
        if let Some(child) = node.first_child {
            return Some(child);
        }
        let mut cursor = current;
        loop {
            if cursor == self.root {
                return None;
            }
            let node = self.tree.get(cursor)?;
            if let Some(sibling) = node.next_sibling {
                return Some(sibling);
            }
            cursor = node.parent?;
        }
    }
}
