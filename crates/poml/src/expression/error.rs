//! Error types for expression evaluation.

use strsim::levenshtein;
use thiserror::Error;

/// An error raised while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The expression is not well formed.
    #[error("syntax error in '{expression}' at {line}:{column}: {message}")]
    Syntax {
        expression: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// An identifier is not bound in the current scope.
    #[error("'{name}' is not defined{}", did_you_mean(suggestions))]
    UndefinedVariable {
        name: String,
        suggestions: Vec<String>,
    },

    /// An operation was applied to a value that does not support it.
    #[error("type error: {message}")]
    Type { message: String },
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

/// Find names close to `target` for "did you mean" hints.
///
/// Allows an edit distance of 1 for short names and 2 for names longer than
/// three characters. Returns at most three suggestions, closest first.
pub fn compute_suggestions(target: &str, available: &[String]) -> Vec<String> {
    let max_distance = if target.chars().count() > 3 { 2 } else { 1 };
    let mut candidates: Vec<(usize, &String)> = available
        .iter()
        .filter(|candidate| candidate.as_str() != target)
        .map(|candidate| (levenshtein(target, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
