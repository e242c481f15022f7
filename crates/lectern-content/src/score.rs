//! Subtree scoring
//!
//! The weights are behavioral contract, reproduced exactly: text length
//! capped at 50, two points per paragraph, a link-density penalty of 20,
//! and a 10-point bonus when the class or id carries a content hint.

use lectern_dom::{DocumentTree, NodeId};

const TEXT_LENGTH_DIVISOR: f64 = 100.0;
const TEXT_SCORE_CAP: f64 = 50.0;
const PARAGRAPH_WEIGHT: f64 = 2.0;
const LINK_DENSITY_PENALTY: f64 = 20.0;
const HINT_BONUS: f64 = 10.0;

/// Class/id vocabulary that marks a likely content container
const HINT_VOCABULARY: &[&str] = &["content", "article", "post", "main"];

const PARAGRAPH_TAG: &str = "p";
const LINK_TAG: &str = "a";

/// Desirability score of a candidate container.
pub fn score<T: DocumentTree + ?Sized>(tree: &T, container: NodeId) -> f64 {
    let text_len = tree.text_content(container).chars().count() as f64;

    let mut paragraphs = 0usize;
    let mut link_text_len = 0.0;
    for id in tree.subtree(container) {
        match tree.tag(id) {
            Some(PARAGRAPH_TAG) => paragraphs += 1,
            Some(LINK_TAG) => {
                link_text_len += tree.text_content(id).chars().count() as f64;
            }
            _ => {}
        }
    }

    let mut score = (text_len / TEXT_LENGTH_DIVISOR).min(TEXT_SCORE_CAP);
    score += PARAGRAPH_WEIGHT * paragraphs as f64;
    score -= LINK_DENSITY_PENALTY * (link_text_len / text_len.max(1.0));

    let mut naming = String::new();
    if let Some(class) = tree.attr(container, "class") {
        naming.push_str(class);
    }
    if let Some(id) = tree.attr(container, "id") {
        naming.push_str(id);
    }
    let naming = naming.to_lowercase();
    if HINT_VOCABULARY.iter().any(|hint| naming.contains(hint)) {
        score += HINT_BONUS;
    }

    score
}
