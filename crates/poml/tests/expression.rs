//! Tests for the built-in expression language.

use poml::expression::{EvalError, compute_suggestions};
use poml::{Evaluator, Scope, ScriptEvaluator, Value};

fn scope() -> Scope {
    let mut scope = Scope::new();
    scope.bind("name", "Ada");
    scope.bind("count", 3);
    scope.bind("items", vec!["a", "b", "c"]);
    scope.bind("empty", "");
    scope.bind(
        "user",
        Value::from(serde_json::json!({ "name": "Grace", "roles": ["admin"] })),
    );
    scope
}

fn eval(expression: &str) -> Value {
    ScriptEvaluator.evaluate(expression, &scope()).unwrap()
}

fn eval_str(expression: &str) -> String {
    eval(expression).to_string()
}

// =========================================================================
// Arithmetic and strings
// =========================================================================

#[test]
fn arithmetic() {
    assert_eq!(eval("1 + 2 * 3"), Value::from(7));
    assert_eq!(eval("(1 + 2) * 3"), Value::from(9));
    assert_eq!(eval("count - 1 - 1"), Value::from(1));
    assert_eq!(eval("7 % 4"), Value::from(3));
    assert_eq!(eval_str("7 / 2"), "3.5");
    assert_eq!(eval_str("-count"), "-3");
    assert_eq!(eval_str("0 / 0"), "NaN");
    assert_eq!(eval_str("-1 / 0"), "-Infinity");
    assert_eq!(eval_str("1.5e2"), "150");
}

#[test]
fn plus_concatenates_strings() {
    assert_eq!(eval_str("'Hello, ' + name"), "Hello, Ada");
    assert_eq!(eval_str("count + '!'"), "3!");
    assert_eq!(eval_str("items + ''"), "a,b,c");
    assert_eq!(eval_str(r#""a" + 1 + 2"#), "a12");
    assert_eq!(eval_str(r#"1 + 2 + "a""#), "3a");
}

#[test]
fn arithmetic_coerces_strings() {
    assert_eq!(eval("'6' * '7'"), Value::from(42));
    assert_eq!(eval_str("'x' * 2"), "NaN");
    assert_eq!(eval("true + 1"), Value::from(2));
}

// =========================================================================
// Comparison and logic
// =========================================================================

#[test]
fn comparisons() {
    assert_eq!(eval("count > 2"), Value::Bool(true));
    assert_eq!(eval("count <= 2"), Value::Bool(false));
    assert_eq!(eval("'apple' < 'banana'"), Value::Bool(true));
    assert_eq!(eval("'10' < 9"), Value::Bool(false));
    assert_eq!(eval("count == '3'"), Value::Bool(true));
    assert_eq!(eval("count !== '3'"), Value::Bool(true));
}

#[test]
fn logical_operators_return_operands() {
    assert_eq!(eval("empty || 'default'"), Value::from("default"));
    assert_eq!(eval("name && count"), Value::from(3));
    assert_eq!(eval("empty && missing"), Value::from(""));
    assert_eq!(eval("name || missing"), Value::from("Ada"));
    assert_eq!(eval("!empty"), Value::Bool(true));
    assert_eq!(eval("!!items"), Value::Bool(true));
}

#[test]
fn ternary() {
    assert_eq!(eval("count > 1 ? 'many' : 'one'"), Value::from("many"));
    assert_eq!(eval("false ? 1 : true ? 2 : 3"), Value::from(2));
}

// =========================================================================
// Access
// =========================================================================

#[test]
fn member_and_index_access() {
    assert_eq!(eval("user.name"), Value::from("Grace"));
    assert_eq!(eval("user.roles[0]"), Value::from("admin"));
    assert_eq!(eval("user['name']"), Value::from("Grace"));
    assert_eq!(eval("items[count - 1]"), Value::from("c"));
    assert_eq!(eval("items.length"), Value::from(3));
    assert_eq!(eval("name.length"), Value::from(3));
    assert_eq!(eval("user.missing"), Value::Null);
    assert_eq!(eval("items[10]"), Value::Null);
    assert_eq!(eval("[1, 'two', [3]][2][0]"), Value::from(3));
}

#[test]
fn literals() {
    assert_eq!(eval("null"), Value::Null);
    assert_eq!(eval("undefined"), Value::Null);
    assert_eq!(eval("'tab\\there'"), Value::from("tab\there"));
    assert_eq!(eval("[]"), Value::List(vec![]));
}

#[test]
fn string_index_yields_character() {
    assert_eq!(eval("name[1]"), Value::from("d"));
    assert_eq!(eval("name[5]"), Value::Null);
}

#[test]
fn number_display_uses_exponent_at_extremes() {
    assert_eq!(eval_str("1e21"), "1e+21");
    assert_eq!(eval_str("-2.5e30"), "-2.5e+30");
    assert_eq!(eval_str("1e-7"), "1e-7");
    assert_eq!(eval_str("0.000001"), "0.000001");
    assert_eq!(eval_str("123456789012"), "123456789012");
}

#[test]
fn map_display() {
    assert_eq!(eval_str("user"), "[object Object]");
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn undefined_variable_with_suggestions() {
    let err = ScriptEvaluator.evaluate("nmae", &scope()).unwrap_err();
    match err {
        EvalError::UndefinedVariable { name, suggestions } => {
            assert_eq!(name, "nmae");
            assert_eq!(suggestions, vec!["name"]);
        }
        other => panic!("expected undefined variable, got {other:?}"),
    }
}

#[test]
fn syntax_errors() {
    for source in ["1 +", "(1", "a ? b", "'open", "[1, 2", "a..b", "a ="] {
        let err = ScriptEvaluator.evaluate(source, &scope()).unwrap_err();
        assert!(
            matches!(err, EvalError::Syntax { .. }),
            "expected syntax error for {source:?}, got {err:?}"
        );
    }
}

#[test]
fn member_of_missing_property_is_a_type_error() {
    let err = ScriptEvaluator
        .evaluate("user.missing.deeper", &scope())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "type error: cannot read property 'deeper' of null"
    );
}

#[test]
fn suggestions_are_bounded() {
    let names: Vec<String> = ["item", "items", "itemz", "other", "idem"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let suggestions = compute_suggestions("itme", &names);
    assert!(suggestions.len() <= 3);
    assert_eq!(suggestions[0], "item");
    assert!(compute_suggestions("zzzzzz", &names).is_empty());
}

#[test]
fn custom_evaluator_closure() {
    let shout = |expression: &str, _: &Scope| -> Result<Value, EvalError> {
        Ok(Value::from(expression.to_uppercase()))
    };
    assert_eq!(
        shout.evaluate("hi", &Scope::new()).unwrap(),
        Value::from("HI")
    );
}
