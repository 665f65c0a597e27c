//! Parser for the `for="item in expression"` directive.

use winnow::ascii::{multispace0, multispace1};
use winnow::combinator::{delimited, preceded};
use winnow::prelude::*;
use winnow::token::{rest, take_while};

/// A parsed `for` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForDirective<'a> {
    /// Name bound to each item.
    pub binding: &'a str,
    /// Expression producing the sequence, trimmed.
    pub iterable: &'a str,
}

/// Parse `<identifier> in <expression>`.
///
/// Returns `None` when the value does not have that shape; the element is
/// then rendered as an ordinary element.
pub fn parse_for(value: &str) -> Option<ForDirective<'_>> {
    let mut input = value;
    let (binding, iterable) = (
        delimited(multispace0, identifier, multispace1),
        preceded(("in", multispace1), rest),
    )
        .parse_next(&mut input)
        .ok()?;

    let iterable = iterable.trim();
    if iterable.is_empty() {
        return None;
    }
    Some(ForDirective { binding, iterable })
}

fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}
