//! Render engine for POML prompt markup.
//!
//! A POML document is an XML-like tree whose text is rendered against a
//! variable context:
//!
//! ```
//! use poml::{context, render_str};
//!
//! let out = render_str(
//!     r#"<poml>
//!         <let name="greeting" value="Hello"/>
//!         <p for="item in items">{{ greeting }} {{ item }}{{ loop.last ? '' : ', ' }}</p>
//!     </poml>"#,
//!     &context! { "items" => vec!["Ada", "Grace"] },
//! )
//! .unwrap();
//! assert_eq!(out, "Hello Ada, Hello Grace");
//! ```
//!
//! Rendering runs in two passes. The embedded `<stylesheet>` (see
//! [`stylesheet`]) is removed and applied to the owned tree, then the
//! [`Renderer`] walks the tree, evaluating `if`, `for`, `<let>`,
//! `<include>` and `{{ ... }}` through a pluggable [`Evaluator`].

pub mod builder;
pub mod expression;
pub mod parser;
pub mod renderer;
pub mod stylesheet;
pub mod types;

use std::path::Path;

pub use builder::DocumentBuilder;
pub use expression::{EvalError, Evaluator, ScriptEvaluator};
pub use parser::{ParseError, parse};
pub use renderer::{FsLoader, MemoryLoader, RenderError, Renderer, SourceLoader};
pub use stylesheet::Stylesheet;
pub use types::{Context, Element, Node, Scope, Text, Value};

/// Render a document tree with a default [`Renderer`].
pub fn render(root: Element, context: &Context) -> Result<String, RenderError> {
    Renderer::default().render(root, context)
}

/// Parse and render a document with a default [`Renderer`].
pub fn render_str(source: &str, context: &Context) -> Result<String, RenderError> {
    Renderer::default().render_str(source, context)
}

/// Read, parse and render a document file with a default [`Renderer`].
pub fn render_file(path: impl AsRef<Path>, context: &Context) -> Result<String, RenderError> {
    Renderer::default().render_file(path, context)
}

/// Creates a [`Context`] from key-value pairs.
///
/// Values are converted via `Into<Value>`, so numbers, strings, booleans,
/// vectors and JSON values can be passed directly.
///
/// # Example
///
/// ```
/// use poml::{context, Value};
///
/// let ctx = context! { "count" => 3, "name" => "Alice" };
/// assert_eq!(ctx.len(), 2);
/// assert_eq!(ctx["count"].as_number(), Some(3.0));
/// assert_eq!(ctx["name"].as_str(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! context {
    {} => {
        $crate::Context::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = $crate::Context::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
