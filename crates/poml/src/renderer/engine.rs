//! Tree-walking render engine.

use std::collections::BTreeMap;
use std::path::Path;

use bon::Builder;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::expression::{Evaluator, ScriptEvaluator};
use crate::parser::{parse, parse_bytes};
use crate::renderer::context::RenderContext;
use crate::renderer::directive::parse_for;
use crate::renderer::interpolate::interpolate;
use crate::renderer::loader::{FsLoader, SourceLoader};
use crate::renderer::RenderError;
use crate::stylesheet::extract_stylesheet;
use crate::types::{Context, Element, Node, Scope, Value};

/// Default limit on `<include>` nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default limit on element nesting, counted across includes.
pub const DEFAULT_MAX_NESTING: usize = 128;

/// Renders POML documents to text.
///
/// A renderer owns its collaborators: the [`Evaluator`] used for `if`,
/// `for` and `{{ ... }}`, and the [`SourceLoader`] used for `<include>` and
/// `<let src>`. Rendering never mutates the renderer, so one instance can
/// serve any number of documents.
///
/// # Example
///
/// ```
/// use poml::{context, Renderer};
/// use poml::renderer::MemoryLoader;
///
/// let renderer = Renderer::builder()
///     .loader(Box::new(
///         MemoryLoader::new().with_source("greeting.poml", "<p>Hi {{ name }}</p>"),
///     ))
///     .build();
///
/// let out = renderer
///     .render_str(r#"<poml><include src="greeting.poml"/></poml>"#, &context! { "name" => "Ada" })
///     .unwrap();
/// assert_eq!(out, "Hi Ada");
/// ```
#[derive(Builder)]
pub struct Renderer {
    /// Expression evaluator (default: [`ScriptEvaluator`]).
    #[builder(default = Box::new(ScriptEvaluator) as Box<dyn Evaluator>)]
    evaluator: Box<dyn Evaluator>,

    /// Source provider for includes and `let src` (default: [`FsLoader`]).
    #[builder(default = Box::new(FsLoader::new()) as Box<dyn SourceLoader>)]
    loader: Box<dyn SourceLoader>,

    /// Maximum include nesting depth (default 64).
    #[builder(default = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum element nesting depth (default 128).
    #[builder(default = DEFAULT_MAX_NESTING)]
    max_nesting: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::builder().build()
    }
}

impl Renderer {
    /// Create a renderer with the default evaluator and filesystem loader.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_nesting(&self) -> usize {
        self.max_nesting
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Render a document tree.
    ///
    /// The stylesheet, if any, is extracted and applied to the owned tree
    /// first. The tree is then walked with a scope built from `context`.
    pub fn render(&self, mut root: Element, context: &Context) -> Result<String, RenderError> {
        let mut state = RenderContext::new(self.max_depth, self.max_nesting);
        self.render_document(&mut root, None, context, &mut state)
    }

    /// Parse and render a document.
    pub fn render_str(&self, source: &str, context: &Context) -> Result<String, RenderError> {
        let root = parse(source)?;
        self.render(root, context)
    }

    /// Read a document through the loader, then parse and render it.
    ///
    /// The file itself opens the include chain, so a document including
    /// itself is reported as a cycle.
    pub fn render_file(
        &self,
        path: impl AsRef<Path>,
        context: &Context,
    ) -> Result<String, RenderError> {
        let path = path.as_ref();
        let mut root = self.load_document(path)?;

        let mut state = RenderContext::new(self.max_depth, self.max_nesting);
        state.push_include(&path.to_string_lossy())?;
        self.render_document(&mut root, Some(path), context, &mut state)
    }

    // =========================================================================
    // Tree walk
    // =========================================================================

    fn render_document(
        &self,
        root: &mut Element,
        path: Option<&Path>,
        context: &Context,
        state: &mut RenderContext,
    ) -> Result<String, RenderError> {
        let stylesheet = extract_stylesheet(root).map_err(|source| RenderError::Parse {
            path: path.map(Path::to_path_buf),
            source,
        })?;
        if let Some(stylesheet) = stylesheet {
            stylesheet.apply(root);
        }

        let scope = Scope::from_context(context);
        let mut output = String::new();
        self.render_element(root, &scope, state, &mut output)?;
        Ok(output)
    }

    fn render_node(
        &self,
        node: &Node,
        scope: &Scope,
        state: &mut RenderContext,
        output: &mut String,
    ) -> Result<(), RenderError> {
        match node {
            Node::Text(text) => {
                output.push_str(&interpolate(&text.content, scope, self.evaluator.as_ref()));
                Ok(())
            }
            Node::Element(element) => self.render_element(element, scope, state, output),
        }
    }

    /// Render an element within the nesting limit.
    fn render_element(
        &self,
        element: &Element,
        scope: &Scope,
        state: &mut RenderContext,
        output: &mut String,
    ) -> Result<(), RenderError> {
        state.enter_element()?;
        let result = self.expand_element(element, scope, state, output);
        state.leave_element();
        result
    }

    /// Render an element, expanding a `for` directive when present.
    fn expand_element(
        &self,
        element: &Element,
        scope: &Scope,
        state: &mut RenderContext,
        output: &mut String,
    ) -> Result<(), RenderError> {
        let Some(directive) = element.attr("for").and_then(parse_for) else {
            return self.render_element_body(element, scope, state, output);
        };

        let items = match self.evaluate("for", directive.iterable, scope)? {
            Value::List(items) => items,
            other => {
                trace!(
                    tag = element.tag.as_str(),
                    kind = other.type_name(),
                    "for value is not a sequence, rendering once"
                );
                return self.render_element_body(element, scope, state, output);
            }
        };

        let length = items.len();
        trace!(tag = element.tag.as_str(), length, "expanding for loop");
        for (index, item) in items.into_iter().enumerate() {
            let mut iteration = scope.fork();
            iteration.bind(directive.binding, item);
            iteration.bind("loop", loop_metadata(index, length));

            let mut segment = String::new();
            self.render_element_body(element, &iteration, state, &mut segment)?;
            output.push_str(&segment);
        }
        Ok(())
    }

    /// Render an element's children, honouring `if`, `<let>` and `<include>`.
    fn render_element_body(
        &self,
        element: &Element,
        scope: &Scope,
        state: &mut RenderContext,
        output: &mut String,
    ) -> Result<(), RenderError> {
        if let Some(condition) = element.attr("if") {
            let passed = self.evaluate("if", condition, scope)?.is_truthy();
            trace!(tag = element.tag.as_str(), condition, passed, "evaluated if");
            if !passed {
                return Ok(());
            }
        }

        let mut local = scope.fork();
        for child in &element.children {
            match child {
                Node::Element(binding) if binding.tag == "let" => {
                    self.bind_let(binding, &mut local)?;
                }
                Node::Element(include) if include.tag == "include" => {
                    self.render_include(include, &local, state, output)?;
                }
                _ => self.render_node(child, &local, state, output)?,
            }
        }
        Ok(())
    }

    /// Bind a `<let>` into the local scope.
    ///
    /// The value comes from `value` (verbatim string), else `src` (JSON
    /// file), else a leading text child (inline JSON). Without `name`, or
    /// without any value source, nothing is bound.
    fn bind_let(&self, element: &Element, scope: &mut Scope) -> Result<(), RenderError> {
        let Some(name) = element.attr("name") else {
            trace!("skipping let without name");
            return Ok(());
        };

        let value = if let Some(value) = element.attr("value") {
            Value::from(value)
        } else if let Some(src) = element.attr("src") {
            debug!(name, src, "loading let source");
            let bytes = self.read_source(Path::new(src))?;
            parse_json(name, &bytes)?
        } else if let Some(text) = element.first_text() {
            parse_json(name, text.as_bytes())?
        } else {
            trace!(name, "skipping let without value");
            return Ok(());
        };

        scope.bind(name, value);
        Ok(())
    }

    /// Render an included document inline with the current scope.
    ///
    /// Included documents do not go through the stylesheet pass.
    fn render_include(
        &self,
        element: &Element,
        scope: &Scope,
        state: &mut RenderContext,
        output: &mut String,
    ) -> Result<(), RenderError> {
        let Some(src) = element.attr("src") else {
            trace!("skipping include without src");
            return Ok(());
        };

        state.push_include(src)?;
        debug!(src, depth = state.depth(), "including document");
        let result = self
            .load_document(Path::new(src))
            .and_then(|root| self.render_element(&root, scope, state, output));
        state.pop_include();
        result
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn evaluate(
        &self,
        attribute: &str,
        expression: &str,
        scope: &Scope,
    ) -> Result<Value, RenderError> {
        self.evaluator
            .evaluate(expression, scope)
            .map_err(|source| RenderError::Eval {
                attribute: attribute.to_string(),
                expression: expression.to_string(),
                source,
            })
    }

    fn read_source(&self, path: &Path) -> Result<Vec<u8>, RenderError> {
        self.loader.read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn load_document(&self, path: &Path) -> Result<Element, RenderError> {
        let bytes = self.read_source(path)?;
        parse_bytes(&bytes).map_err(|source| RenderError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })
    }
}

fn parse_json(name: &str, bytes: &[u8]) -> Result<Value, RenderError> {
    serde_json::from_slice::<JsonValue>(bytes)
        .map(Value::from)
        .map_err(|source| RenderError::Json {
            name: name.to_string(),
            source,
        })
}

/// The `loop` binding visible inside each `for` iteration.
fn loop_metadata(index: usize, length: usize) -> Value {
    let mut meta = BTreeMap::new();
    meta.insert("index".to_string(), Value::from(index));
    meta.insert("first".to_string(), Value::from(index == 0));
    meta.insert("last".to_string(), Value::from(index + 1 == length));
    meta.insert("length".to_string(), Value::from(length));
    Value::Map(meta)
}
