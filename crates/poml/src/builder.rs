//! Fluent construction of document trees in code.

use crate::renderer::{RenderError, Renderer};
use crate::types::{Context, Element, Text};

/// Builds a document tree without writing markup.
///
/// The builder keeps a cursor on the current element. [`add`](Self::add)
/// descends into a new child, [`end`](Self::end) climbs back to its parent.
///
/// # Example
///
/// ```
/// use poml::{context, DocumentBuilder};
///
/// let mut builder = DocumentBuilder::new();
/// builder
///     .add("p")
///     .attr("if", "show")
///     .text("Hello, {{ name }}")
///     .end();
///
/// let out = builder.render(&context! { "show" => true, "name" => "World" }).unwrap();
/// assert_eq!(out, "Hello, World");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    /// Open elements, root first. Never empty.
    stack: Vec<Element>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    /// Tag of the root element created by [`DocumentBuilder::new`].
    pub const ROOT_TAG: &'static str = "poml";

    /// Start a document with a `<poml>` root.
    pub fn new() -> Self {
        Self::with_root(Self::ROOT_TAG)
    }

    /// Start a document with a custom root tag.
    pub fn with_root(tag: impl Into<String>) -> Self {
        Self {
            stack: vec![Element::new(tag)],
        }
    }

    /// Append a child element to the current element and descend into it.
    pub fn add(&mut self, tag: impl Into<String>) -> &mut Self {
        self.stack.push(Element::new(tag));
        self
    }

    /// Set an attribute on the current element.
    pub fn attr(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        if let Some(current) = self.stack.last_mut() {
            current.set_attr(name, value);
        }
        self
    }

    /// Append a text child to the current element.
    pub fn text(&mut self, content: impl Into<String>) -> &mut Self {
        if let Some(current) = self.stack.last_mut() {
            current.push(Text::new(content));
        }
        self
    }

    /// Close the current element. Does nothing at the root.
    pub fn end(&mut self) -> &mut Self {
        if self.stack.len() > 1 {
            close_current(&mut self.stack);
        }
        self
    }

    /// Current nesting depth; the root is depth 0.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Return the finished tree, closing any elements still open.
    ///
    /// The builder is left untouched and can keep building.
    pub fn build(&self) -> Element {
        let mut open = self.stack.clone();
        while open.len() > 1 {
            close_current(&mut open);
        }
        open.pop().unwrap_or_else(|| Element::new(Self::ROOT_TAG))
    }

    /// Build the tree and render it with a default [`Renderer`].
    pub fn render(&self, context: &Context) -> Result<String, RenderError> {
        Renderer::default().render(self.build(), context)
    }
}

/// Pop the innermost open element and attach it to its parent.
fn close_current(stack: &mut Vec<Element>) {
    let Some(finished) = stack.pop() else {
        return;
    };
    if let Some(parent) = stack.last_mut() {
        parent.push(finished);
    }
}
