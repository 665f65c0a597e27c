//! Public AST types for text interpolation.

/// A parsed text run, split into literal text and `{{ ... }}` spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    /// Check if any segment needs evaluation.
    pub fn has_interpolations(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Interpolation { .. }))
    }
}

/// A segment within a text run.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, passed through unchanged.
    Literal(String),
    /// An interpolation span.
    Interpolation {
        /// The enclosed expression, trimmed.
        expression: String,
        /// The span exactly as written, delimiters included. Emitted when
        /// the expression fails to evaluate.
        source: String,
    },
}
