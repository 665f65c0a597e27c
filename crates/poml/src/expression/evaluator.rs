//! Evaluation of parsed expressions against a scope.

use std::cmp::Ordering;

use tracing::trace;

use super::ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
use super::error::{EvalError, compute_suggestions};
use super::parser::parse_expression;
use crate::types::{Scope, Value};

/// Evaluates the expressions found in `if`, `for` and `{{ ... }}`.
///
/// The render engine only ever talks to this trait, so any expression
/// language can be plugged in. Closures with the right signature implement
/// it directly:
///
/// ```
/// use poml::{Evaluator, Scope, Value};
/// use poml::expression::EvalError;
///
/// let upper = |expression: &str, _scope: &Scope| -> Result<Value, EvalError> {
///     Ok(Value::from(expression.to_uppercase()))
/// };
/// let value = upper.evaluate("shout", &Scope::new()).unwrap();
/// assert_eq!(value.to_string(), "SHOUT");
/// ```
pub trait Evaluator {
    /// Evaluate `expression` with the bindings of `scope`.
    fn evaluate(&self, expression: &str, scope: &Scope) -> Result<Value, EvalError>;
}

impl<F> Evaluator for F
where
    F: Fn(&str, &Scope) -> Result<Value, EvalError>,
{
    fn evaluate(&self, expression: &str, scope: &Scope) -> Result<Value, EvalError> {
        self(expression, scope)
    }
}

/// The built-in JavaScript-flavoured expression language.
///
/// # Example
///
/// ```
/// use poml::{Evaluator, Scope, ScriptEvaluator, Value};
///
/// let mut scope = Scope::new();
/// scope.bind("items", vec!["a", "b", "c"]);
///
/// let evaluator = ScriptEvaluator;
/// let value = evaluator.evaluate("items.length > 2 ? items[0] : 'none'", &scope).unwrap();
/// assert_eq!(value, Value::from("a"));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptEvaluator;

impl Evaluator for ScriptEvaluator {
    fn evaluate(&self, expression: &str, scope: &Scope) -> Result<Value, EvalError> {
        let expr = parse_expression(expression)?;
        let value = eval_expr(&expr, scope)?;
        trace!(expression, result = %value, "evaluated expression");
        Ok(value)
    }
}

/// Evaluate an expression tree.
pub fn eval_expr(expr: &Expr, scope: &Scope) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Array(items) => items
            .iter()
            .map(|item| eval_expr(item, scope))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Expr::Identifier(name) => resolve_identifier(name, scope),
        Expr::Member { object, property } => {
            let object = eval_expr(object, scope)?;
            member(&object, property)
        }
        Expr::Index { object, index } => {
            let object = eval_expr(object, scope)?;
            let index = eval_expr(index, scope)?;
            lookup_index(&object, &index)
        }
        Expr::Unary { op, operand } => {
            let operand = eval_expr(operand, scope)?;
            Ok(match op {
                UnaryOp::Not => Value::Bool(!operand.is_truthy()),
                UnaryOp::Negate => Value::Number(-operand.to_number()),
            })
        }
        Expr::Binary { op, left, right } => {
            let left = eval_expr(left, scope)?;
            let right = eval_expr(right, scope)?;
            Ok(binary(*op, &left, &right))
        }
        Expr::Logical { op, left, right } => {
            let left = eval_expr(left, scope)?;
            match (op, left.is_truthy()) {
                (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(left),
                _ => eval_expr(right, scope),
            }
        }
        Expr::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            if eval_expr(condition, scope)?.is_truthy() {
                eval_expr(then_branch, scope)
            } else {
                eval_expr(else_branch, scope)
            }
        }
    }
}

fn resolve_identifier(name: &str, scope: &Scope) -> Result<Value, EvalError> {
    scope
        .get(name)
        .cloned()
        .ok_or_else(|| EvalError::UndefinedVariable {
            name: name.to_string(),
            suggestions: compute_suggestions(name, &scope.names()),
        })
}

/// Property access. Missing properties are null; reading from null is an error.
fn member(object: &Value, property: &str) -> Result<Value, EvalError> {
    if object.is_null() {
        return Err(EvalError::Type {
            message: format!("cannot read property '{property}' of null"),
        });
    }

    Ok(match (object, property) {
        (Value::Map(map), _) => map.get(property).cloned().unwrap_or_default(),
        (Value::List(items), "length") => Value::from(items.len()),
        (Value::String(s), "length") => Value::from(s.chars().count()),
        _ => Value::Null,
    })
}

fn lookup_index(object: &Value, index: &Value) -> Result<Value, EvalError> {
    if object.is_null() {
        return Err(EvalError::Type {
            message: format!("cannot read index '{index}' of null"),
        });
    }

    let position = as_position(index);
    Ok(match (object, position) {
        (Value::List(items), Some(i)) => items.get(i).cloned().unwrap_or_default(),
        (Value::String(s), Some(i)) => s.chars().nth(i).map(Value::from).unwrap_or_default(),
        _ => return member(object, &index.to_string()),
    })
}

/// Interpret a value as a sequence position, if it is a non-negative integer.
fn as_position(index: &Value) -> Option<usize> {
    let n = index.as_number()?;
    if n.fract() != 0.0 || n < 0.0 || n > usize::MAX as f64 {
        return None;
    }
    Some(n as usize)
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Rem => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Le => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::Ge => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::Eq => Value::Bool(loose_eq(left, right)),
        BinaryOp::Ne => Value::Bool(!loose_eq(left, right)),
        BinaryOp::StrictEq => Value::Bool(left == right),
        BinaryOp::StrictNe => Value::Bool(left != right),
    }
}

/// `+` concatenates when either side is a string, sequence or mapping.
fn add(left: &Value, right: &Value) -> Value {
    let concatenates = |value: &Value| {
        matches!(
            value,
            Value::String(_) | Value::List(_) | Value::Map(_)
        )
    };
    if concatenates(left) || concatenates(right) {
        Value::String(format!("{left}{right}"))
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

/// Strings compare lexically, everything else numerically. `None` when unordered.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

fn loose_eq(left: &Value, right: &Value) -> bool {
    if left.type_name() == right.type_name() {
        return left == right;
    }
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::List(_) | Value::Map(_), Value::String(s))
        | (Value::String(s), Value::List(_) | Value::Map(_)) => {
            let other = if left.as_str().is_some() { right } else { left };
            other.to_string() == *s
        }
        _ => left.to_number() == right.to_number(),
    }
}
