//! Node-handle abstraction
//!
//! The engine never owns the tree it enhances and must not assume a
//! particular tree technology. Everything it needs from a document is
//! expressed here: kind and tag, attribute lookup, aggregate text, child
//! enumeration, parent lookup (read-only), host-recorded bounds, and a
//! mutable visible flag. Implementations adapt a concrete tree type to
//! this interface.

use crate::NodeId;
use crate::geometry::Rect;

/// Read/annotate access to a live document tree
pub trait DocumentTree {
    /// Root node of the document
    fn root(&self) -> NodeId;

    /// Parent lookup. Lookup-only: the engine never mutates upward.
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Child handles in document order
    fn child_ids(&self, id: NodeId) -> Vec<NodeId>;

    /// Whether the node is an element
    fn is_element(&self, id: NodeId) -> bool;

    /// Lowercase tag name for elements, `None` for other node kinds
    fn tag(&self, id: NodeId) -> Option<&str>;

    /// Attribute value, `None` when absent (or not an element)
    fn attr(&self, id: NodeId, name: &str) -> Option<&str>;

    /// Set an attribute, replacing any existing value
    fn set_attr(&mut self, id: NodeId, name: &str, value: &str);

    /// Remove an attribute; absent attributes are a no-op
    fn remove_attr(&mut self, id: NodeId, name: &str);

    /// Aggregate text of the subtree rooted at `id`, document order
    fn text_content(&self, id: NodeId) -> String;

    /// Current visible flag (missing nodes read as visible)
    fn is_visible(&self, id: NodeId) -> bool;

    /// Toggle the visible flag. The only structural-adjacent mutation the
    /// filtering concern performs.
    fn set_visible(&mut self, id: NodeId, visible: bool);

    /// Geometry recorded by the host, if any
    fn bounds(&self, id: NodeId) -> Option<Rect>;

    /// Whether the node is still reachable from the root
    fn is_attached(&self, id: NodeId) -> bool;

    /// `id` plus its descendants, pre-order (document order)
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let mut children = self.child_ids(current);
            children.reverse();
            stack.append(&mut children);
        }
        out
    }

    /// Add a class token to the `class` attribute; already-present tokens
    /// are left alone
    fn add_class(&mut self, id: NodeId, class: &str) {
        let merged = match self.attr(id, "class") {
            Some(existing) => {
                if existing.split_ascii_whitespace().any(|c| c == class) {
                    return;
                }
                format!("{existing} {class}")
            }
            None => class.to_string(),
        };
        self.set_attr(id, "class", &merged);
    }
}
