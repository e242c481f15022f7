//! Media preparation
//!
//! Autoplay suppression for the initial pass: reading pages should not
//! start playing media on their own.

use lectern_dom::DocumentTree;

const AUTOPLAY_ATTR: &str = "autoplay";
const AUTOPLAY_TAGS: &[&str] = &["video", "audio"];

/// Strip the autoplay attribute from every media element. Returns how
/// many elements were touched; repeat calls are no-ops.
pub fn suppress_autoplay<T: DocumentTree>(tree: &mut T) -> usize {
    let root = tree.root();
    let mut stripped = 0;
    for id in tree.subtree(root) {
        let is_media = tree
            .tag(id)
            .is_some_and(|tag| AUTOPLAY_TAGS.contains(&tag));
        if is_media && tree.attr(id, AUTOPLAY_ATTR).is_some() {
            tree.remove_attr(id, AUTOPLAY_ATTR);
            stripped += 1;
        }
    }
    if stripped > 0 {
        tracing::debug!(stripped, "autoplay suppressed");
    }
    stripped
}
