//! Deferred media loading
//!
//! Per watched node the state machine is `pending -> resolved`, terminal.
//! A watch record holds the real source while the placeholder is shown;
//! it is destroyed on resolution, or dismissed when the node left the
//! tree before ever becoming visible.

use std::collections::{HashMap, HashSet};

use lectern_dom::{DocumentTree, NodeId};

use crate::viewport::Viewport;

/// Fixed 1x1 placeholder shown while the real source is deferred
pub const PLACEHOLDER_SRC: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMSIgaGVpZ2h0PSIxIiB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciPjxyZWN0IHdpZHRoPSIxIiBoZWlnaHQ9IjEiIGZpbGw9IiNjY2MiLz48L3N2Zz4=";

const MEDIA_TAG: &str = "img";
const SRC_ATTR: &str = "src";

#[derive(Debug)]
struct WatchRecord {
    original_src: String,
}

/// Watches off-screen media and restores it on first visibility
#[derive(Debug, Default)]
pub struct ViewportLoader {
    pending: HashMap<NodeId, WatchRecord>,
    resolved: HashSet<NodeId>,
}

impl ViewportLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-time setup: every media node with a recorded position outside
    /// `viewport` is swapped to the placeholder and watched. Nodes
    /// already inside the region (or without geometry) load through the
    /// normal path and are never watched.
    pub fn initialize<T: DocumentTree>(&mut self, tree: &mut T, viewport: &Viewport) {
        let root = tree.root();
        for id in tree.subtree(root) {
            if tree.tag(id) != Some(MEDIA_TAG) {
                continue;
            }
            if self.pending.contains_key(&id) || self.resolved.contains(&id) {
                continue;
            }
            let Some(src) = tree.attr(id, SRC_ATTR).map(str::to_owned) else {
                continue;
            };
            let Some(bounds) = tree.bounds(id) else {
                continue;
            };
            if viewport.is_outside(&bounds) {
                tree.set_attr(id, SRC_ATTR, PLACEHOLDER_SRC);
                self.pending.insert(id, WatchRecord { original_src: src });
            }
        }
        tracing::info!(watched = self.pending.len(), "lazy loading initialized");
    }

    /// Handle a batch of region-entry events. The first entry for a node
    /// restores its real source and drops the watch; later events for the
    /// same node are ignored, so a resolved source never reverts.
    pub fn on_enter<T: DocumentTree>(&mut self, tree: &mut T, entered: &[NodeId]) {
        for id in entered {
            let Some(record) = self.pending.remove(id) else {
                continue;
            };
            if !tree.is_attached(*id) {
                // the node is gone; nothing to restore, nothing to retry
                tracing::debug!(?id, "watched node detached before resolution");
                continue;
            }
            tree.set_attr(*id, SRC_ATTR, &record.original_src);
            self.resolved.insert(*id);
            tracing::debug!(?id, "deferred media resolved");
        }
    }

    /// Whether a node is currently waiting for its first entry
    pub fn is_pending(&self, id: NodeId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Tear down every outstanding watch (owning context teardown).
    /// Sources already swapped to the placeholder are restored so no
    /// media is stranded behind a watch that will never fire.
    pub fn disconnect<T: DocumentTree>(&mut self, tree: &mut T) {
        for (id, record) in self.pending.drain() {
            if tree.is_attached(id) {
                tree.set_attr(id, SRC_ATTR, &record.original_src);
            }
        }
        self.resolved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_dom::{Rect, Tree};

    fn image(tree: &mut Tree, src: &str, y: f32) -> NodeId {
        let img = tree.create_element("img");
        tree.set_attr(img, "src", src);
        let root = Tree::root(tree);
        tree.append_child(root, img);
        tree.set_bounds(img, Rect::new(0.0, y, 100.0, 80.0));
        img
    }

    fn viewport() -> Viewport {
        Viewport::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn test_offscreen_media_gets_placeholder() {
        let mut tree = Tree::new();
        let above = image(&mut tree, "visible.png", 100.0);
        let below = image(&mut tree, "deferred.png", 900.0);

        let mut loader = ViewportLoader::new();
        loader.initialize(&mut tree, &viewport());

        assert_eq!(tree.attr(above, "src"), Some("visible.png"));
        assert_eq!(tree.attr(below, "src"), Some(PLACEHOLDER_SRC));
        assert!(loader.is_pending(below));
        assert!(!loader.is_pending(above));
    }

    #[test]
    fn test_first_entry_restores_and_never_reverts() {
        let mut tree = Tree::new();
        let below = image(&mut tree, "deferred.png", 900.0);

        let mut loader = ViewportLoader::new();
        loader.initialize(&mut tree, &viewport());
        assert_eq!(tree.attr(below, "src"), Some(PLACEHOLDER_SRC));

        loader.on_enter(&mut tree, &[below]);
        assert_eq!(tree.attr(below, "src"), Some("deferred.png"));
        assert!(!loader.is_pending(below));

        // a duplicate entry event must not touch the node again
        tree.set_attr(below, "src", "changed-by-host.png");
        loader.on_enter(&mut tree, &[below]);
        assert_eq!(tree.attr(below, "src"), Some("changed-by-host.png"));
    }

    #[test]
    fn test_reinitialize_skips_resolved_nodes() {
        let mut tree = Tree::new();
        let below = image(&mut tree, "deferred.png", 900.0);

        let mut loader = ViewportLoader::new();
        loader.initialize(&mut tree, &viewport());
        loader.on_enter(&mut tree, &[below]);

        loader.initialize(&mut tree, &viewport());
        assert_eq!(tree.attr(below, "src"), Some("deferred.png"));
        assert_eq!(loader.pending_count(), 0);
    }

    #[test]
    fn test_media_without_geometry_is_left_alone() {
        let mut tree = Tree::new();
        let img = tree.create_element("img");
        tree.set_attr(img, "src", "no-bounds.png");
        let root = Tree::root(&tree);
        tree.append_child(root, img);

        let mut loader = ViewportLoader::new();
        loader.initialize(&mut tree, &viewport());
        assert_eq!(tree.attr(img, "src"), Some("no-bounds.png"));
        assert_eq!(loader.pending_count(), 0);
    }

    #[test]
    fn test_detached_node_watch_is_discarded() {
        let mut tree = Tree::new();
        let below = image(&mut tree, "deferred.png", 900.0);

        let mut loader = ViewportLoader::new();
        loader.initialize(&mut tree, &viewport());

        tree.detach(below);
        loader.on_enter(&mut tree, &[below]);
        assert!(!loader.is_pending(below));
        // still showing the placeholder; the node is gone from the tree
        assert_eq!(tree.attr(below, "src"), Some(PLACEHOLDER_SRC));
    }

    #[test]
    fn test_disconnect_restores_pending_sources() {
        let mut tree = Tree::new();
        let below = image(&mut tree, "deferred.png", 900.0);

        let mut loader = ViewportLoader::new();
        loader.initialize(&mut tree, &viewport());
        assert_eq!(tree.attr(below, "src"), Some(PLACEHOLDER_SRC));

        loader.disconnect(&mut tree);
        assert_eq!(tree.attr(below, "src"), Some("deferred.png"));
        assert_eq!(loader.pending_count(), 0);
    }
}
