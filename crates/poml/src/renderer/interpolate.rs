//! `{{ ... }}` substitution in text runs.

use tracing::trace;

use crate::expression::Evaluator;
use crate::parser::{Segment, parse_template};
use crate::types::Scope;

/// Replace every `{{ expression }}` span in `text` with its evaluated value.
///
/// A span whose expression fails to evaluate is kept exactly as written;
/// the remaining spans are still substituted. Text outside spans passes
/// through unchanged.
///
/// # Example
///
/// ```
/// use poml::renderer::interpolate;
/// use poml::{Scope, ScriptEvaluator};
///
/// let mut scope = Scope::new();
/// scope.bind("name", "API");
///
/// let out = interpolate("Hello, {{ name }} and {{ missing }}", &scope, &ScriptEvaluator);
/// assert_eq!(out, "Hello, API and {{ missing }}");
/// ```
pub fn interpolate(text: &str, scope: &Scope, evaluator: &dyn Evaluator) -> String {
    let template = parse_template(text);
    if !template.has_interpolations() {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len());
    for segment in &template.segments {
        match segment {
            Segment::Literal(literal) => output.push_str(literal),
            Segment::Interpolation { expression, source } => {
                match evaluator.evaluate(expression, scope) {
                    Ok(value) => output.push_str(&value.to_string()),
                    Err(error) => {
                        trace!(expression = expression.as_str(), %error, "keeping span verbatim");
                        output.push_str(source);
                    }
                }
            }
        }
    }
    output
}
