use std::collections::BTreeMap;

use bon::Builder;

/// A node in a POML document tree.
///
/// The variant set is closed: a document is made of elements and the text
/// runs between them. Every consumer matches on both variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A tagged element with attributes and children.
    Element(Element),

    /// A raw text run.
    Text(Text),
}

impl Node {
    /// Get this node as an element, if it is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Get this node as a text run, if it is one.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    /// Check if this node is an element with the given tag.
    pub fn is_element(&self, tag: &str) -> bool {
        self.as_element().is_some_and(|element| element.tag == tag)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

/// A POML element such as `<p>` or `<task>`.
///
/// Children are kept in document order, which is also render order.
///
/// # Example
///
/// ```
/// use poml::{Element, Node, Text};
///
/// let p = Element::builder()
///     .tag("p")
///     .attributes([("speaker".to_string(), "human".to_string())].into())
///     .children(vec![Node::Text(Text::new("Hello"))])
///     .build();
///
/// assert_eq!(p.attr("speaker"), Some("human"));
/// assert_eq!(p.first_text(), Some("Hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(on(String, into))]
pub struct Element {
    /// Tag name, never empty.
    pub tag: String,

    /// Attribute map. Keys are unique and order carries no meaning.
    #[builder(default)]
    pub attributes: BTreeMap<String, String>,

    /// Child nodes in document order.
    #[builder(default)]
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes and no children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Append a child node.
    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Content of the first child, when that child is a text run.
    pub fn first_text(&self) -> Option<&str> {
        self.children
            .first()
            .and_then(Node::as_text)
            .map(|text| text.content.as_str())
    }

    /// Iterate over the direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

/// A raw text run inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub content: String,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
