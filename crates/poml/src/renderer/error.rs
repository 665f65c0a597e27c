//! Error types for rendering.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::expression::EvalError;
use crate::parser::ParseError;

/// An error that aborts a render. Partial output is discarded.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document, an included document or the stylesheet failed to parse.
    #[error("{}{source}", path.as_ref().map(|p| format!("{}: ", p.display())).unwrap_or_default())]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: ParseError,
    },

    /// A `<let>` payload is not valid JSON.
    #[error("invalid JSON for let binding '{name}': {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// An `if` or `for` expression failed to evaluate.
    #[error("failed to evaluate {attribute}=\"{expression}\": {source}")]
    Eval {
        attribute: String,
        expression: String,
        #[source]
        source: EvalError,
    },

    /// An included document or `let src` file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Includes nested deeper than the configured limit.
    #[error("maximum include depth of {depth} exceeded")]
    MaxDepthExceeded { depth: usize },

    /// Elements nested deeper than the configured limit.
    #[error("maximum element nesting of {depth} exceeded")]
    MaxNestingExceeded { depth: usize },

    /// A document includes itself, directly or through other documents.
    #[error("cyclic include detected: {}", chain.join(" -> "))]
    CyclicInclude { chain: Vec<String> },
}

impl From<ParseError> for RenderError {
    fn from(source: ParseError) -> Self {
        RenderError::Parse { path: None, source }
    }
}
