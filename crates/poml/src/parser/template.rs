//! Interpolation parser using winnow.
//!
//! Splits text content into literal runs and `{{ expression }}` spans.
//! Spans do not nest: the enclosed expression is any non-empty run without a
//! `}`. An opening `{{` that never closes is literal text.

use super::ast::*;
use winnow::combinator::{alt, delimited, repeat};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Opening delimiter of an interpolation span.
pub const OPEN_DELIMITER: &str = "{{";

/// Closing delimiter of an interpolation span.
pub const CLOSE_DELIMITER: &str = "}}";

/// Parse text content into a template.
///
/// Parsing never fails: anything that is not a well-formed span is literal.
///
/// # Example
///
/// ```
/// use poml::parser::{parse_template, Segment};
///
/// let template = parse_template("Hello, {{ name }}!");
/// assert_eq!(
///     template.segments[1],
///     Segment::Interpolation {
///         expression: "name".to_string(),
///         source: "{{ name }}".to_string(),
///     }
/// );
/// ```
pub fn parse_template(input: &str) -> Template {
    if !input.contains(OPEN_DELIMITER) {
        return Template {
            segments: vec![Segment::Literal(input.to_string())],
        };
    }

    let mut remaining = input;
    match template(&mut remaining) {
        Ok(mut parsed) => {
            if !remaining.is_empty() {
                parsed.segments.push(Segment::Literal(remaining.to_string()));
            }
            parsed.segments = merge_literals(parsed.segments);
            parsed
        }
        Err(_) => Template {
            segments: vec![Segment::Literal(input.to_string())],
        },
    }
}

/// Parse a complete template into segments.
fn template(input: &mut &str) -> ModalResult<Template> {
    let segments: Vec<Segment> = repeat(0.., segment).parse_next(input)?;
    Ok(Template {
        segments: merge_literals(segments),
    })
}

/// Merge adjacent Literal segments into single segments.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            other => result.push(other),
        }
    }

    result
}

/// Parse a single segment (interpolation, literal run, or a lone brace).
fn segment(input: &mut &str) -> ModalResult<Segment> {
    alt((interpolation, literal_run, lone_brace)).parse_next(input)
}

/// Parse an interpolation: {{ expression }}
fn interpolation(input: &mut &str) -> ModalResult<Segment> {
    delimited(
        OPEN_DELIMITER,
        take_while(1.., |c: char| c != '}'),
        CLOSE_DELIMITER,
    )
    .with_taken()
    .map(|(expression, source): (&str, &str)| Segment::Interpolation {
        expression: expression.trim().to_string(),
        source: source.to_string(),
    })
    .parse_next(input)
}

/// Parse literal text up to the next brace.
fn literal_run(input: &mut &str) -> ModalResult<Segment> {
    take_till(1.., '{')
        .map(|text: &str| Segment::Literal(text.to_string()))
        .parse_next(input)
}

/// Parse a `{` that does not start a span.
fn lone_brace(input: &mut &str) -> ModalResult<Segment> {
    "{".value(Segment::Literal("{".to_string()))
        .parse_next(input)
}
