//! Mutation filtering
//!
//! Stateful watcher over the live tree: one depth-first initial scan,
//! then the same match-and-hide pass over every mutation batch. Per node
//! the state machine is `unseen -> seen-kept | hidden`, and `hidden` is
//! terminal — re-presenting a hidden node in a later batch is a no-op and
//! nothing here ever restores visibility. Hiding is commutative per node,
//! so the end state of a batch does not depend on arrival order.

use std::collections::HashSet;

use lectern_dom::{DocumentTree, NodeId};

use crate::pattern::{PatternError, PatternSet};

/// Built-in advertising rule list
pub const AD_RULES: &[&str] = &[
    r#"[class*="ad-"]"#,
    r#"[class*="ads-"]"#,
    r#"[id*="ad-"]"#,
    r#"[id*="ads-"]"#,
    ".advertisement",
    ".google-ads",
    ".banner-ad",
    ".popup-ad",
    "[data-ad]",
    r#"iframe[src*="googlesyndication"]"#,
    r#"iframe[src*="doubleclick"]"#,
    ".ad-container",
    ".ads-container",
];

/// Built-in popup-shaped rule list
pub const POPUP_RULES: &[&str] = &[
    ".modal",
    ".popup",
    ".overlay",
    r#"[class*="popup"]"#,
    r#"[class*="modal"]"#,
    r#"[id*="popup"]"#,
    r#"[id*="modal"]"#,
];

/// A popup-shaped node is hidden only when its aggregate text contains
/// one of these (lowercase containment). Legitimate modal UIs stay.
pub const AD_KEYWORDS: &[&str] = &["ad", "advertisement"];

/// Running counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub ads_hidden: usize,
    pub popups_hidden: usize,
    /// Batch entries the matcher could not classify (non-element kinds)
    pub skipped: usize,
}

/// Watches the tree and neutralizes matching subtrees exactly once
#[derive(Debug)]
pub struct MutationFilter {
    ads: PatternSet,
    popups: PatternSet,
    keywords: Vec<String>,
    hidden: HashSet<NodeId>,
    stats: FilterStats,
}

impl MutationFilter {
    pub fn new(ads: PatternSet, popups: PatternSet, keywords: &[&str]) -> Self {
        Self {
            ads,
            popups,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            hidden: HashSet::new(),
            stats: FilterStats::default(),
        }
    }

    /// Compile the built-in rule lists. Compilation failure here is fatal
    /// at startup: the fixed rule set is a build-time contract.
    pub fn with_default_rules() -> Result<Self, PatternError> {
        Ok(Self::new(
            PatternSet::compile(AD_RULES)?,
            PatternSet::compile(POPUP_RULES)?,
            AD_KEYWORDS,
        ))
    }

    /// One-time depth-first walk of the whole tree. Idempotent:
    /// re-scanning leaves already-hidden nodes hidden.
    pub fn scan_initial<T: DocumentTree>(&mut self, tree: &mut T) {
        let root = tree.root();
        for id in tree.subtree(root) {
            if tree.is_element(id) {
                self.inspect(tree, id);
            }
        }
        tracing::info!(
            ads = self.stats.ads_hidden,
            popups = self.stats.popups_hidden,
            "initial filter scan complete"
        );
    }

    /// Apply match-and-hide over a batch of newly attached nodes and
    /// their descendants, in the order supplied. A node kind the matcher
    /// cannot classify is skipped; the rest of the batch proceeds.
    pub fn on_mutation<T: DocumentTree>(&mut self, tree: &mut T, added: &[NodeId]) {
        for &id in added {
            if !tree.is_element(id) {
                self.stats.skipped += 1;
                tracing::debug!(?id, "skipping unclassifiable batch node");
                continue;
            }
            for descendant in tree.subtree(id) {
                if tree.is_element(descendant) {
                    self.inspect(tree, descendant);
                }
            }
        }
    }

    fn inspect<T: DocumentTree>(&mut self, tree: &mut T, id: NodeId) {
        if self.hidden.contains(&id) {
            return;
        }
        if self.ads.matches(tree, id) {
            self.hide(tree, id);
            self.stats.ads_hidden += 1;
            tracing::debug!(?id, "ad subtree hidden");
            return;
        }
        if self.popups.matches(tree, id) {
            let text = tree.text_content(id).to_lowercase();
            if self.keywords.iter().any(|k| text.contains(k.as_str())) {
                self.hide(tree, id);
                self.stats.popups_hidden += 1;
                tracing::debug!(?id, "ad-bearing popup hidden");
            }
        }
    }

    fn hide<T: DocumentTree>(&mut self, tree: &mut T, id: NodeId) {
        tree.set_visible(id, false);
        self.hidden.insert(id);
    }

    /// Whether this filter has hidden the node
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.hidden.contains(&id)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Drop all bookkeeping (owning context teardown). The tree itself is
    /// left as-is; hidden nodes stay hidden.
    pub fn reset(&mut self) {
        self.hidden.clear();
        self.stats = FilterStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_dom::Tree;

    fn filter() -> MutationFilter {
        MutationFilter::with_default_rules().expect("built-in rules compile")
    }

    fn element_with_text(tree: &mut Tree, tag: &str, class: &str, text: &str) -> NodeId {
        let el = tree.create_element(tag);
        if !class.is_empty() {
            tree.set_attr(el, "class", class);
        }
        if !text.is_empty() {
            let t = tree.create_text(text);
            tree.append_child(el, t);
        }
        el
    }

    #[test]
    fn test_default_rules_compile() {
        let f = filter();
        assert_eq!(f.stats(), FilterStats::default());
    }

    #[test]
    fn test_initial_scan_hides_ads() {
        let mut tree = Tree::new();
        let ad = element_with_text(&mut tree, "div", "ad-banner", "buy things");
        let content = element_with_text(&mut tree, "div", "content", "an article");
        let root = Tree::root(&tree);
        tree.append_child(root, ad);
        tree.append_child(root, content);

        let mut f = filter();
        f.scan_initial(&mut tree);

        assert!(!tree.is_visible(ad));
        assert!(tree.is_visible(content));
        assert_eq!(f.stats().ads_hidden, 1);
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let mut tree = Tree::new();
        let ad = element_with_text(&mut tree, "div", "ads-container", "");
        let root = Tree::root(&tree);
        tree.append_child(root, ad);

        let mut f = filter();
        f.scan_initial(&mut tree);
        assert!(!tree.is_visible(ad));
        assert_eq!(f.stats().ads_hidden, 1);

        f.scan_initial(&mut tree);
        assert!(!tree.is_visible(ad));
        // already-hidden nodes are not reprocessed
        assert_eq!(f.stats().ads_hidden, 1);
    }

    #[test]
    fn test_popup_without_ad_keyword_is_kept() {
        let mut tree = Tree::new();
        let modal = element_with_text(&mut tree, "div", "modal", "Confirm your choice");
        let root = Tree::root(&tree);
        tree.append_child(root, modal);

        let mut f = filter();
        f.scan_initial(&mut tree);
        assert!(tree.is_visible(modal));
        assert_eq!(f.stats().popups_hidden, 0);
    }

    #[test]
    fn test_popup_with_ad_keyword_is_hidden() {
        let mut tree = Tree::new();
        let modal = element_with_text(&mut tree, "div", "popup", "Special Advertisement inside");
        let root = Tree::root(&tree);
        tree.append_child(root, modal);

        let mut f = filter();
        f.scan_initial(&mut tree);
        assert!(!tree.is_visible(modal));
        assert_eq!(f.stats().popups_hidden, 1);
    }

    #[test]
    fn test_mutation_batch_walks_descendants() {
        let mut tree = Tree::new();
        let root = Tree::root(&tree);
        let wrapper = tree.create_element("section");
        let nested_ad = element_with_text(&mut tree, "div", "google-ads", "");
        tree.append_child(root, wrapper);
        tree.append_child(wrapper, nested_ad);

        let mut f = filter();
        f.on_mutation(&mut tree, &[wrapper]);
        assert!(!tree.is_visible(nested_ad));
        assert!(tree.is_visible(wrapper));
    }

    #[test]
    fn test_unclassifiable_batch_nodes_are_skipped() {
        let mut tree = Tree::new();
        let root = Tree::root(&tree);
        let text = tree.create_text("loose text");
        let comment = tree.create_comment("note");
        let ad = element_with_text(&mut tree, "div", "banner-ad", "");
        tree.append_child(root, text);
        tree.append_child(root, comment);
        tree.append_child(root, ad);

        let mut f = filter();
        f.on_mutation(&mut tree, &[text, comment, ad]);
        // the rest of the batch still proceeds
        assert!(!tree.is_visible(ad));
        assert_eq!(f.stats().skipped, 2);
    }

    #[test]
    fn test_hidden_is_terminal_across_batches() {
        let mut tree = Tree::new();
        let ad = element_with_text(&mut tree, "div", "ad-unit", "");
        let root = Tree::root(&tree);
        tree.append_child(root, ad);

        let mut f = filter();
        f.on_mutation(&mut tree, &[ad]);
        assert!(!tree.is_visible(ad));

        // a later batch re-presents the same node
        f.on_mutation(&mut tree, &[ad]);
        assert!(!tree.is_visible(ad));
        assert_eq!(f.stats().ads_hidden, 1);
    }
}
