//! Structural patterns
//!
//! Declarative node classifiers compiled once from a static rule list.
//! The grammar is a small selector subset: `tag`, `.class`, `#id`,
//! `[attr]`, `[attr*="value"]`, compounds such as `iframe[src*="x"]`, and
//! descendant chains separated by whitespace. Class, id and attribute
//! values match by substring containment; tag names match exactly.
//! Compilation is the only place parsing happens — a malformed rule is an
//! initialization error, and match time only reads.

use lectern_dom::{DocumentTree, NodeId};

/// Rule text the compiler cannot turn into a pattern
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("missing name after `{marker}` in `{pattern}`")]
    MissingName { pattern: String, marker: char },
    #[error("unterminated attribute predicate in `{0}`")]
    UnterminatedAttribute(String),
    #[error("unsupported syntax `{found}` in `{pattern}`")]
    Unsupported { pattern: String, found: String },
}

/// A compiled structural pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Left-to-right; the last step matches the node itself, earlier steps
    /// match ancestors (descendant relation).
    steps: Vec<Step>,
    source: String,
}

#[derive(Debug, Clone)]
struct Step {
    tag: Option<String>,
    preds: Vec<AttrPredicate>,
}

#[derive(Debug, Clone)]
struct AttrPredicate {
    attr: String,
    op: AttrOp,
}

#[derive(Debug, Clone)]
enum AttrOp {
    Present,
    Contains(String),
}

impl Pattern {
    /// Compile one rule. Fatal at initialization on malformed input.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }
        let steps = split_compounds(trimmed)
            .into_iter()
            .map(|part| parse_compound(&part, trimmed))
            .collect::<Result<Vec<Step>, PatternError>>()?;
        if steps.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Self {
            steps,
            source: trimmed.to_string(),
        })
    }

    /// The rule text this pattern was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `node` satisfies this pattern. Never errors: predicates
    /// over missing attributes are simply false.
    pub fn matches<T: DocumentTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
        let Some((last, ancestor_steps)) = self.steps.split_last() else {
            return false;
        };
        if !step_matches(tree, node, last) {
            return false;
        }
        // Remaining steps must match strictly higher ancestors, innermost
        // step nearest the node.
        let mut cursor = node;
        for step in ancestor_steps.iter().rev() {
            let mut found = false;
            while let Some(parent) = tree.parent(cursor) {
                cursor = parent;
                if step_matches(tree, cursor, step) {
                    found = true;
                    break;
                }
            }
            if !found {
                return false;
            }
        }
        true
    }
}

/// An ordered set of patterns with any-of match semantics
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile a rule list; the first malformed rule fails the whole set.
    pub fn compile<I, S>(sources: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = sources
            .into_iter()
            .map(|s| Pattern::compile(s.as_ref()))
            .collect::<Result<Vec<Pattern>, PatternError>>()?;
        Ok(Self { patterns })
    }

    pub fn matches<T: DocumentTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
        self.patterns.iter().any(|p| p.matches(tree, node))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn step_matches<T: DocumentTree + ?Sized>(tree: &T, node: NodeId, step: &Step) -> bool {
    if !tree.is_element(node) {
        return false;
    }
    if let Some(tag) = &step.tag {
        if tree.tag(node) != Some(tag.as_str()) {
            return false;
        }
    }
    step.preds.iter().all(|pred| match &pred.op {
        AttrOp::Present => tree.attr(node, &pred.attr).is_some(),
        AttrOp::Contains(needle) => tree
            .attr(node, &pred.attr)
            .is_some_and(|value| value.contains(needle.as_str())),
    })
}

/// Split on whitespace outside attribute brackets.
fn split_compounds(source: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in source.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn parse_compound(part: &str, full: &str) -> Result<Step, PatternError> {
    let mut step = Step {
        tag: None,
        preds: Vec::new(),
    };
    let mut rest = part;

    if !rest.starts_with(['.', '#', '[']) {
        let end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
        let tag = &rest[..end];
        if !is_name(tag) {
            return Err(PatternError::Unsupported {
                pattern: full.to_string(),
                found: tag.to_string(),
            });
        }
        step.tag = Some(tag.to_ascii_lowercase());
        rest = &rest[end..];
    }

    while !rest.is_empty() {
        if let Some(r) = rest.strip_prefix('.') {
            let (name, tail) = take_name(r);
            if name.is_empty() {
                return Err(PatternError::MissingName {
                    pattern: full.to_string(),
                    marker: '.',
                });
            }
            step.preds.push(AttrPredicate {
                attr: "class".to_string(),
                op: AttrOp::Contains(name.to_string()),
            });
            rest = tail;
        } else if let Some(r) = rest.strip_prefix('#') {
            let (name, tail) = take_name(r);
            if name.is_empty() {
                return Err(PatternError::MissingName {
                    pattern: full.to_string(),
                    marker: '#',
                });
            }
            step.preds.push(AttrPredicate {
                attr: "id".to_string(),
                op: AttrOp::Contains(name.to_string()),
            });
            rest = tail;
        } else if let Some(r) = rest.strip_prefix('[') {
            let Some(close) = r.find(']') else {
                return Err(PatternError::UnterminatedAttribute(full.to_string()));
            };
            step.preds.push(parse_attr_body(&r[..close], full)?);
            rest = &r[close + 1..];
        } else {
            return Err(PatternError::Unsupported {
                pattern: full.to_string(),
                found: rest.chars().take(1).collect(),
            });
        }
    }

    Ok(step)
}

fn parse_attr_body(body: &str, full: &str) -> Result<AttrPredicate, PatternError> {
    if let Some((name, value)) = body.split_once("*=") {
        let name = name.trim();
        if !is_name(name) {
            return Err(PatternError::Unsupported {
                pattern: full.to_string(),
                found: name.to_string(),
            });
        }
        let value = value.trim().trim_matches(['"', '\'']);
        return Ok(AttrPredicate {
            attr: name.to_ascii_lowercase(),
            op: AttrOp::Contains(value.to_string()),
        });
    }
    if body.contains('=') {
        // only substring matching is part of the contract
        return Err(PatternError::Unsupported {
            pattern: full.to_string(),
            found: body.to_string(),
        });
    }
    let name = body.trim();
    if !is_name(name) {
        return Err(PatternError::Unsupported {
            pattern: full.to_string(),
            found: name.to_string(),
        });
    }
    Ok(AttrPredicate {
        attr: name.to_ascii_lowercase(),
        op: AttrOp::Present,
    })
}

fn take_name(s: &str) -> (&str, &str) {
    let end = s.find(['.', '#', '[']).unwrap_or(s.len());
    (&s[..end], &s[end..])
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
