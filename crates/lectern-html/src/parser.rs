//! Pull-parser driven tree construction
//!
//! Lenient by intent: documents in the wild carry unclosed void elements,
//! stray end tags, and vendor attribute soup. Anything structurally
//! unrecoverable surfaces as [`ParseError`]; everything else degrades to
//! the closest tree shape.

use lectern_dom::{DocumentTree, NodeId, Tree};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Markup that could not be turned into a tree
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed markup: {0}")]
    Markup(#[from] quick_xml::Error),
}

/// HTML elements that never carry children; in non-XHTML input they
/// arrive as start events with no matching end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Parse markup into an arena tree rooted at the document node.
pub fn parse(markup: &str) -> Result<Tree, ParseError> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;

    let mut tree = Tree::new();
    // Open elements; the document root is always the bottom entry.
    let mut stack: Vec<(NodeId, String)> = vec![(tree.root(), String::new())];
    let mut buf = Vec::with_capacity(256);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag = decode_name(&reader, &e);
                let id = open_element(&mut tree, &reader, &e, &tag, &stack);
                if !VOID_ELEMENTS.contains(&tag.as_str()) {
                    stack.push((id, tag));
                }
            }
            Ok(Event::Empty(e)) => {
                let tag = decode_name(&reader, &e);
                open_element(&mut tree, &reader, &e, &tag, &stack);
            }
            Ok(Event::End(e)) => {
                let tag = reader
                    .decoder()
                    .decode(e.name().as_ref())
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                // Close the innermost matching element; ignore strays.
                match stack.iter().rposition(|(_, open)| *open == tag) {
                    Some(0) | None => {
                        tracing::debug!(%tag, "ignoring unmatched end tag");
                    }
                    Some(pos) => stack.truncate(pos),
                }
            }
            Ok(Event::Text(e)) => {
                let text = reader.decoder().decode(&e).unwrap_or_default();
                if !text.is_empty() {
                    let parent = stack.last().map(|(id, _)| *id).unwrap_or(tree.root());
                    let node = tree.create_text(text.as_ref());
                    tree.append_child(parent, node);
                }
            }
            Ok(Event::CData(e)) => {
                let text = reader.decoder().decode(e.as_ref()).unwrap_or_default();
                let parent = stack.last().map(|(id, _)| *id).unwrap_or(tree.root());
                let node = tree.create_text(text.as_ref());
                tree.append_child(parent, node);
            }
            Ok(Event::Comment(e)) => {
                let text = reader.decoder().decode(e.as_ref()).unwrap_or_default();
                let parent = stack.last().map(|(id, _)| *id).unwrap_or(tree.root());
                let node = tree.create_comment(text.as_ref());
                tree.append_child(parent, node);
            }
            Ok(Event::Eof) => break,
            // Doctype and processing instructions carry no tree content.
            Ok(_) => {}
            Err(err) => return Err(ParseError::Markup(err)),
        }
        buf.clear();
    }

    Ok(tree)
}

fn decode_name(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> String {
    reader
        .decoder()
        .decode(e.name().as_ref())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn open_element(
    tree: &mut Tree,
    reader: &Reader<&[u8]>,
    e: &BytesStart<'_>,
    tag: &str,
    stack: &[(NodeId, String)],
) -> NodeId {
    let id = tree.create_element(tag);
    for attr in e.attributes().flatten() {
        let name = reader
            .decoder()
            .decode(attr.key.as_ref())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let value = reader
            .decoder()
            .decode(attr.value.as_ref())
            .unwrap_or_default();
        tree.set_attr(id, &name, value.as_ref());
    }
    let parent = stack.last().map(|(pid, _)| *pid).unwrap_or(tree.root());
    tree.append_child(parent, id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_dom::DocumentTree;

    #[test]
    fn test_parse_basic_structure() {
        let tree = parse(r#"<body><div class="content"><p>Hello</p></div></body>"#).unwrap();
        let root = tree.root();

        let body = tree.child_ids(root)[0];
        assert_eq!(tree.tag(body), Some("body"));

        let div = tree.child_ids(body)[0];
        assert_eq!(tree.tag(div), Some("div"));
        assert_eq!(tree.attr(div, "class"), Some("content"));
        assert_eq!(tree.text_content(div), "Hello");
    }

    #[test]
    fn test_parse_void_and_empty_elements() {
        let tree = parse(r#"<body><img src="a.png"><p>after</p><br/></body>"#).unwrap();
        let body = tree.child_ids(tree.root())[0];
        let children = tree.child_ids(body);
        assert_eq!(children.len(), 3);
        assert_eq!(tree.tag(children[0]), Some("img"));
        assert_eq!(tree.attr(children[0], "src"), Some("a.png"));
        // the paragraph is a sibling of the unclosed img, not its child
        assert_eq!(tree.tag(children[1]), Some("p"));
        assert_eq!(tree.tag(children[2]), Some("br"));
    }

    #[test]
    fn test_parse_tolerates_stray_end_tags() {
        let tree = parse("<body><p>text</p></div></body>").unwrap();
        let body = tree.child_ids(tree.root())[0];
        assert_eq!(tree.text_content(body), "text");
    }

    #[test]
    fn test_parse_keeps_comments_as_nodes() {
        let tree = parse("<body><!-- promo --><p>x</p></body>").unwrap();
        let body = tree.child_ids(tree.root())[0];
        let children = tree.child_ids(body);
        assert_eq!(children.len(), 2);
        assert!(!tree.is_element(children[0]));
    }

    #[test]
    fn test_parse_lowercases_names() {
        let tree = parse(r#"<BODY><DIV CLASS="Ad-Banner"></DIV></BODY>"#).unwrap();
        let body = tree.child_ids(tree.root())[0];
        assert_eq!(tree.tag(body), Some("body"));
        let div = tree.child_ids(body)[0];
        // attribute names fold, values are preserved
        assert_eq!(tree.attr(div, "class"), Some("Ad-Banner"));
    }
}
