//! Parse error types for POML documents.

use thiserror::Error;

/// An error that occurred while parsing a document or its stylesheet.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A markup syntax error with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Input ended while an element was still open.
    #[error("unexpected end of input at {line}:{column}")]
    UnexpectedEof { line: usize, column: usize },

    /// Input contained no element at all.
    #[error("document has no root element")]
    NoRootElement,

    /// Invalid UTF-8 in input.
    #[error("invalid UTF-8 in input")]
    InvalidUtf8,

    /// The `<stylesheet>` payload is not a JSON object of attribute maps.
    #[error("malformed stylesheet: {source}")]
    Stylesheet {
        #[source]
        source: serde_json::Error,
    },
}

impl ParseError {
    /// Line and column of the error, when it carries a location.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::Syntax { line, column, .. } | ParseError::UnexpectedEof { line, column } => {
                Some((*line, *column))
            }
            ParseError::NoRootElement | ParseError::InvalidUtf8 | ParseError::Stylesheet { .. } => {
                None
            }
        }
    }
}

/// Calculate 1-based line and column for a byte offset into `input`.
pub(crate) fn calculate_position(input: &str, offset: usize) -> (usize, usize) {
    let mut consumed = offset.min(input.len());
    while !input.is_char_boundary(consumed) {
        consumed -= 1;
    }
    let consumed_str = &input[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed_str[pos + 1..].chars().count() + 1,
        None => consumed_str.chars().count() + 1,
    };
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::calculate_position;

    #[test]
    fn position_on_first_line() {
        assert_eq!(calculate_position("<poml>", 0), (1, 1));
        assert_eq!(calculate_position("<poml>", 3), (1, 4));
    }

    #[test]
    fn position_after_newline() {
        let input = "<poml>\n  <p>";
        assert_eq!(calculate_position(input, 9), (2, 3));
    }

    #[test]
    fn position_clamps_to_input() {
        assert_eq!(calculate_position("ab", 99), (1, 3));
    }
}
