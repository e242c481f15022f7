//! Document nodes
//!
//! Sibling-linked arena representation. Element data stays small: tag
//! name, attribute vector, and host-recorded bounds.

use crate::NodeId;
use crate::geometry::Rect;

/// A single node in the arena
#[derive(Debug)]
pub struct Node {
    /// Parent node (`None` for the root)
    pub parent: Option<NodeId>,
    /// First child
    pub first_child: Option<NodeId>,
    /// Last child (for O(1) append)
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Visible flag. Defaults to true; the filtering concern may clear it,
    /// and never sets it back.
    pub visible: bool,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn detached(data: NodeData) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            visible: true,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::detached(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::detached(NodeData::Text(TextData { content }))
    }

    /// Create a comment node
    pub fn comment(content: String) -> Self {
        Self::detached(NodeData::Comment(content))
    }

    /// Create the document root node
    pub fn document() -> Self {
        Self::detached(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase tag name
    pub name: String,
    /// Attributes in document order
    pub attrs: Vec<Attribute>,
    /// Bounds recorded by the host, if any
    pub bounds: Option<Rect>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            name: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            bounds: None,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attr(&mut self, name: &str, value: &str) {
        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                attr.value = value.to_string();
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Remove an attribute. Removing an absent attribute is a no-op.
    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|a| a.name != name);
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

/// Attribute name/value pair
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
