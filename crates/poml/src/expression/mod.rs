//! Expression language for `if`, `for` and `{{ ... }}` interpolation.
//!
//! The render engine depends only on the [`Evaluator`] trait. The default
//! implementation, [`ScriptEvaluator`], parses a small JavaScript-flavoured
//! language:
//!
//! ```text
//! items.length > 0 && !hidden
//! user.name + ' (' + role + ')'
//! loop.last ? '' : ', '
//! ```

pub mod ast;
mod error;
mod evaluator;
mod parser;

pub use error::{EvalError, compute_suggestions};
pub use evaluator::{Evaluator, ScriptEvaluator, eval_expr};
pub use parser::parse_expression;
