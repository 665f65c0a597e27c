//! Miette diagnostic wrapper for POML parse errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use poml::parser::ParseError;
use poml::stylesheet::STYLESHEET_TAG;
use std::path::Path;
use thiserror::Error;

/// A miette-compatible diagnostic for POML parse errors.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(poml::parse))]
pub struct PomlDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: Option<SourceSpan>,

    message: String,

    #[help]
    help: Option<String>,
}

impl PomlDiagnostic {
    /// Create a diagnostic from a ParseError with source context.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        let (span, help) = match err {
            ParseError::Syntax { line, column, .. } | ParseError::UnexpectedEof { line, column } => {
                (Some((offset_of(content, *line, *column), 1).into()), None)
            }
            ParseError::NoRootElement => (
                None,
                Some("a document needs a root element such as <poml>".to_string()),
            ),
            ParseError::InvalidUtf8 => (None, Some("save the file as UTF-8".to_string())),
            ParseError::Stylesheet { .. } => {
                let opening = format!("<{STYLESHEET_TAG}");
                let span = content
                    .find(&opening)
                    .map(|offset| (offset, opening.len()).into());
                (
                    span,
                    Some(
                        "a stylesheet is a JSON object mapping selectors to attribute maps"
                            .to_string(),
                    ),
                )
            }
        };

        PomlDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span,
            message: err.to_string(),
            help,
        }
    }
}

/// Convert a 1-based line and character column to a byte offset.
fn offset_of(content: &str, line: usize, column: usize) -> usize {
    let line_start = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    let rest = content.get(line_start..).unwrap_or_default();
    let within = rest
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(rest.len(), |(offset, _)| offset);

    // Clamp offset to content length to avoid miette panic on out-of-bounds
    (line_start + within).min(content.len())
}
