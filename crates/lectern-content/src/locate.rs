//! Content-region location
//!
//! Enumerates paragraph-bearing containers in document order, scores
//! each, and picks the strict maximum. Ties resolve to the earliest
//! candidate, so repeated passes over an unchanged tree always agree.

use lectern_dom::{DocumentTree, NodeId};

use crate::score::score;

/// Transient (node, score) pair produced during one locate pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub node: NodeId,
    pub score: f64,
}

/// All candidate containers in document order with their scores.
/// A candidate is any node with at least one direct paragraph child.
pub fn candidates<T: DocumentTree + ?Sized>(tree: &T) -> Vec<ScoredCandidate> {
    let root = tree.root();
    tree.subtree(root)
        .into_iter()
        .filter(|&id| {
            tree.child_ids(id)
                .iter()
                .any(|&child| tree.tag(child) == Some("p"))
        })
        .map(|node| ScoredCandidate {
            node,
            score: score(tree, node),
        })
        .collect()
}

/// Select the primary content region, or `None` when the tree has no
/// paragraph-bearing container (callers fall back to the tree root).
pub fn locate<T: DocumentTree + ?Sized>(tree: &T) -> Option<NodeId> {
    let mut best: Option<ScoredCandidate> = None;
    for candidate in candidates(tree) {
        match best {
            // strictly greater only: first in document order wins ties
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    if let Some(winner) = best {
        tracing::debug!(node = ?winner.node, score = winner.score, "content region located");
    }
    best.map(|c| c.node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_dom::Tree;

    fn paragraph(tree: &mut Tree, parent: NodeId, text: &str) {
        let p = tree.create_element("p");
        let t = tree.create_text(text);
        tree.append_child(p, t);
        tree.append_child(parent, p);
    }

    #[test]
    fn test_locate_prefers_dense_hinted_container() {
        let mut tree = Tree::new();
        let root = Tree::root(&tree);

        // A: 600 chars over 5 paragraphs, no links, class "content"
        let a = tree.create_element("div");
        tree.set_attr(a, "class", "content");
        tree.append_child(root, a);
        for _ in 0..5 {
            paragraph(&mut tree, a, &"a".repeat(120));
        }

        // B: 200 chars, 1 paragraph, 150 chars of link text, class "sidebar"
        let b = tree.create_element("div");
        tree.set_attr(b, "class", "sidebar");
        tree.append_child(root, b);
        paragraph(&mut tree, b, &"b".repeat(50));
        let link = tree.create_element("a");
        let link_text = tree.create_text(&"l".repeat(150));
        tree.append_child(link, link_text);
        tree.append_child(b, link);

        assert_eq!(locate(&tree), Some(a));

        let scored = candidates(&tree);
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].node, a);
        assert_eq!(scored[0].score, 6.0 + 10.0 + 10.0);
        assert_eq!(scored[1].score, 2.0 + 2.0 - 15.0);
    }

    #[test]
    fn test_winner_is_independent_of_document_order() {
        // same containers, sidebar first this time
        let mut tree = Tree::new();
        let root = Tree::root(&tree);

        let b = tree.create_element("div");
        tree.set_attr(b, "class", "sidebar");
        tree.append_child(root, b);
        paragraph(&mut tree, b, &"b".repeat(50));
        let link = tree.create_element("a");
        let link_text = tree.create_text(&"l".repeat(150));
        tree.append_child(link, link_text);
        tree.append_child(b, link);

        let a = tree.create_element("div");
        tree.set_attr(a, "class", "content");
        tree.append_child(root, a);
        for _ in 0..5 {
            paragraph(&mut tree, a, &"a".repeat(120));
        }

        assert_eq!(locate(&tree), Some(a));
    }

    #[test]
    fn test_ties_resolve_to_first_in_document_order() {
        let mut tree = Tree::new();
        let root = Tree::root(&tree);

        let first = tree.create_element("div");
        tree.append_child(root, first);
        paragraph(&mut tree, first, &"x".repeat(100));

        let second = tree.create_element("div");
        tree.append_child(root, second);
        paragraph(&mut tree, second, &"y".repeat(100));

        assert_eq!(score(&tree, first), score(&tree, second));
        assert_eq!(locate(&tree), Some(first));
    }

    #[test]
    fn test_no_paragraphs_means_no_region() {
        let mut tree = Tree::new();
        let root = Tree::root(&tree);
        let div = tree.create_element("div");
        tree.append_child(root, div);
        let span = tree.create_element("span");
        let t = tree.create_text("short");
        tree.append_child(span, t);
        tree.append_child(div, span);

        assert_eq!(locate(&tree), None);
        assert!(candidates(&tree).is_empty());
    }
}
