//! Expression parser using winnow.
//!
//! Precedence, lowest first:
//! - `c ? a : b`
//! - `||`
//! - `&&`
//! - `== != === !==`
//! - `< <= > >=`
//! - `+ -`
//! - `* / %`
//! - unary `!` and `-`
//! - member access `a.b` and indexing `a[i]`

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, opt, preceded, repeat, separated, terminated};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use super::ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
use super::error::EvalError;
use crate::parser::error::calculate_position;
use crate::types::Value;

/// Parse an expression string into an AST.
///
/// The whole input must be consumed; trailing input is a syntax error.
pub fn parse_expression(source: &str) -> Result<Expr, EvalError> {
    let mut remaining = source;
    match terminated(expression, ws).parse_next(&mut remaining) {
        Ok(expr) if remaining.is_empty() => Ok(expr),
        Ok(_) => Err(syntax_error(
            source,
            remaining,
            format!(
                "unexpected character: '{}'",
                remaining.chars().next().unwrap_or('?')
            ),
        )),
        Err(e) => Err(syntax_error(source, remaining, format!("parse error: {e}"))),
    }
}

fn syntax_error(source: &str, remaining: &str, message: String) -> EvalError {
    let (line, column) = calculate_position(source, source.len() - remaining.len());
    EvalError::Syntax {
        expression: source.to_string(),
        line,
        column,
        message,
    }
}

/// Parse optional whitespace.
fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

/// Parse a full expression, including the conditional operator.
fn expression(input: &mut &str) -> ModalResult<Expr> {
    let condition = logical_or(input)?;
    let branches = opt((
        preceded(ws, '?'),
        expression,
        preceded(ws, ':'),
        expression,
    ))
    .parse_next(input)?;

    Ok(match branches {
        Some((_, then_branch, _, else_branch)) => Expr::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        },
        None => condition,
    })
}

fn logical_or(input: &mut &str) -> ModalResult<Expr> {
    let first = logical_and(input)?;
    let rest: Vec<Expr> = repeat(0.., preceded((ws, "||"), logical_and)).parse_next(input)?;
    Ok(fold_logical(LogicalOp::Or, first, rest))
}

fn logical_and(input: &mut &str) -> ModalResult<Expr> {
    let first = equality(input)?;
    let rest: Vec<Expr> = repeat(0.., preceded((ws, "&&"), equality)).parse_next(input)?;
    Ok(fold_logical(LogicalOp::And, first, rest))
}

fn fold_logical(op: LogicalOp, first: Expr, rest: Vec<Expr>) -> Expr {
    rest.into_iter().fold(first, |left, right| Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn equality(input: &mut &str) -> ModalResult<Expr> {
    let first = relational(input)?;
    let rest: Vec<(BinaryOp, Expr)> =
        repeat(0.., (preceded(ws, equality_op), relational)).parse_next(input)?;
    Ok(fold_binary(first, rest))
}

fn relational(input: &mut &str) -> ModalResult<Expr> {
    let first = additive(input)?;
    let rest: Vec<(BinaryOp, Expr)> =
        repeat(0.., (preceded(ws, relational_op), additive)).parse_next(input)?;
    Ok(fold_binary(first, rest))
}

fn additive(input: &mut &str) -> ModalResult<Expr> {
    let first = multiplicative(input)?;
    let rest: Vec<(BinaryOp, Expr)> =
        repeat(0.., (preceded(ws, additive_op), multiplicative)).parse_next(input)?;
    Ok(fold_binary(first, rest))
}

fn multiplicative(input: &mut &str) -> ModalResult<Expr> {
    let first = unary(input)?;
    let rest: Vec<(BinaryOp, Expr)> =
        repeat(0.., (preceded(ws, multiplicative_op), unary)).parse_next(input)?;
    Ok(fold_binary(first, rest))
}

/// Fold a left-associative operator chain.
fn fold_binary(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |left, (op, right)| Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn equality_op(input: &mut &str) -> ModalResult<BinaryOp> {
    alt((
        "===".value(BinaryOp::StrictEq),
        "!==".value(BinaryOp::StrictNe),
        "==".value(BinaryOp::Eq),
        "!=".value(BinaryOp::Ne),
    ))
    .parse_next(input)
}

fn relational_op(input: &mut &str) -> ModalResult<BinaryOp> {
    alt((
        "<=".value(BinaryOp::Le),
        ">=".value(BinaryOp::Ge),
        "<".value(BinaryOp::Lt),
        ">".value(BinaryOp::Gt),
    ))
    .parse_next(input)
}

fn additive_op(input: &mut &str) -> ModalResult<BinaryOp> {
    alt(('+'.value(BinaryOp::Add), '-'.value(BinaryOp::Sub))).parse_next(input)
}

fn multiplicative_op(input: &mut &str) -> ModalResult<BinaryOp> {
    alt((
        '*'.value(BinaryOp::Mul),
        '/'.value(BinaryOp::Div),
        '%'.value(BinaryOp::Rem),
    ))
    .parse_next(input)
}

/// Parse a prefix operator application or a postfix expression.
fn unary(input: &mut &str) -> ModalResult<Expr> {
    ws(input)?;
    alt((
        preceded('!', unary).map(|operand| Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }),
        preceded('-', unary).map(|operand| Expr::Unary {
            op: UnaryOp::Negate,
            operand: Box::new(operand),
        }),
        postfix,
    ))
    .parse_next(input)
}

/// A property or index access following a primary expression.
enum Accessor {
    Member(String),
    Index(Expr),
}

/// Parse a primary expression followed by any number of accessors.
fn postfix(input: &mut &str) -> ModalResult<Expr> {
    let base = primary(input)?;
    let accessors: Vec<Accessor> = repeat(0.., accessor).parse_next(input)?;

    Ok(accessors
        .into_iter()
        .fold(base, |object, accessor| match accessor {
            Accessor::Member(property) => Expr::Member {
                object: Box::new(object),
                property,
            },
            Accessor::Index(index) => Expr::Index {
                object: Box::new(object),
                index: Box::new(index),
            },
        }))
}

fn accessor(input: &mut &str) -> ModalResult<Accessor> {
    alt((
        preceded((ws, '.', ws), identifier).map(|name: &str| Accessor::Member(name.to_string())),
        delimited((ws, '['), expression, (ws, ']')).map(Accessor::Index),
    ))
    .parse_next(input)
}

fn primary(input: &mut &str) -> ModalResult<Expr> {
    preceded(
        ws,
        alt((
            number,
            string_literal,
            array,
            parenthesized,
            identifier_or_keyword,
        )),
    )
    .parse_next(input)
}

/// Parse a decimal number: 12, 1.5, 2e10
fn number(input: &mut &str) -> ModalResult<Expr> {
    (
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .map(|text: &str| Expr::Literal(Value::Number(text.parse().unwrap_or(f64::NAN))))
        .parse_next(input)
}

/// Parse a single- or double-quoted string with backslash escapes.
fn string_literal(input: &mut &str) -> ModalResult<Expr> {
    let quote = one_of(['\'', '"']).parse_next(input)?;
    let mut value = String::new();

    loop {
        match any.parse_next(input)? {
            c if c == quote => return Ok(Expr::Literal(Value::String(value))),
            '\\' => {
                let escaped = any.parse_next(input)?;
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                });
            }
            c => value.push(c),
        }
    }
}

/// Parse an array literal: [a, b, c]
fn array(input: &mut &str) -> ModalResult<Expr> {
    delimited('[', separated(0.., expression, (ws, ',')), (ws, ']'))
        .map(Expr::Array)
        .parse_next(input)
}

fn parenthesized(input: &mut &str) -> ModalResult<Expr> {
    delimited('(', expression, (ws, ')')).parse_next(input)
}

fn identifier_or_keyword(input: &mut &str) -> ModalResult<Expr> {
    identifier
        .map(|name: &str| match name {
            "true" => Expr::Literal(Value::Bool(true)),
            "false" => Expr::Literal(Value::Bool(false)),
            "null" | "undefined" => Expr::Literal(Value::Null),
            "NaN" => Expr::Literal(Value::Number(f64::NAN)),
            "Infinity" => Expr::Literal(Value::Number(f64::INFINITY)),
            _ => Expr::Identifier(name.to_string()),
        })
        .parse_next(input)
}

/// Parse an identifier.
fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (one_of(is_ident_start), take_while(0.., is_ident_cont))
        .take()
        .parse_next(input)
}

/// Check if a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

/// Check if a character can continue an identifier.
fn is_ident_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
