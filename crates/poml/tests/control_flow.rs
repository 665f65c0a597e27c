//! Tests for `if` and `for` directives.

use poml::expression::EvalError;
use poml::{Context, RenderError, context, render_str};

// =========================================================================
// if
// =========================================================================

#[test]
fn if_true_renders() {
    let out = render_str(
        r#"<poml><p if="isVisible">Visible</p></poml>"#,
        &context! { "isVisible" => true },
    )
    .unwrap();
    assert_eq!(out, "Visible");
}

#[test]
fn if_false_renders_nothing() {
    let out = render_str(
        r#"<poml><p if="!isVisible">Hidden</p></poml>"#,
        &context! { "isVisible" => true },
    )
    .unwrap();
    assert_eq!(out, "");
}

#[test]
fn falsy_if_has_no_side_effects() {
    let out = render_str(
        r#"<poml><p if="false"><include src="does-not-exist.poml"/></p>done</poml>"#,
        &Context::new(),
    )
    .unwrap();
    assert_eq!(out, "done");
}

#[test]
fn if_uses_truthiness() {
    let source = r#"<poml><p if="value">yes</p></poml>"#;
    for (value, expected) in [
        (poml::Value::from(0), ""),
        (poml::Value::from(""), ""),
        (poml::Value::Null, ""),
        (poml::Value::from("0"), "yes"),
        (poml::Value::List(vec![]), "yes"),
        (poml::Value::from(2), "yes"),
    ] {
        let out = render_str(source, &context! { "value" => value }).unwrap();
        assert_eq!(out, expected);
    }
}

#[test]
fn undefined_variable_in_if_aborts() {
    let err = render_str(r#"<poml><p if="nope">x</p></poml>"#, &Context::new()).unwrap_err();
    match err {
        RenderError::Eval {
            attribute,
            expression,
            source: EvalError::UndefinedVariable { name, .. },
        } => {
            assert_eq!(attribute, "if");
            assert_eq!(expression, "nope");
            assert_eq!(name, "nope");
        }
        other => panic!("expected eval error, got {other:?}"),
    }
}

// =========================================================================
// for
// =========================================================================

#[test]
fn for_renders_each_item_with_index() {
    let out = render_str(
        r#"<poml><list><item for="item in items">{{ loop.index }}:{{ item }} </item></list></poml>"#,
        &context! { "items" => vec!["a", "b", "c"] },
    )
    .unwrap();
    assert_eq!(out, "0:a 1:b 2:c ");
}

#[test]
fn loop_metadata() {
    let out = render_str(
        r#"<poml><i for="x in xs">{{ x }}={{ loop.first }}/{{ loop.last }}/{{ loop.length }};</i></poml>"#,
        &context! { "xs" => vec!["a", "b"] },
    )
    .unwrap();
    assert_eq!(out, "a=true/false/2;b=false/true/2;");
}

#[test]
fn empty_sequence_renders_nothing() {
    let out = render_str(
        r#"<poml><i for="x in xs">{{ x }}</i>end</poml>"#,
        &context! { "xs" => Vec::<String>::new() },
    )
    .unwrap();
    assert_eq!(out, "end");
}

#[test]
fn if_is_evaluated_per_iteration() {
    let out = render_str(
        r#"<poml><i for="n in nums" if="n % 2 == 0">{{ n }}</i></poml>"#,
        &context! { "nums" => vec![1, 2, 3, 4] },
    )
    .unwrap();
    assert_eq!(out, "24");
}

#[test]
fn nested_loops() {
    let out = render_str(
        r#"<poml><row for="r in rows"><cell for="c in r">{{ c }}</cell>;</row></poml>"#,
        &context! { "rows" => serde_json::json!([[1, 2], [3]]) },
    )
    .unwrap();
    assert_eq!(out, "12;3;");
}

#[test]
fn loop_binding_does_not_escape() {
    let out = render_str(
        r#"<poml><i for="x in xs">{{ x }}</i><p>{{ x }}</p></poml>"#,
        &context! { "xs" => vec!["a", "b"] },
    )
    .unwrap();
    assert_eq!(out, "ab{{ x }}");
}

#[test]
fn array_literal_iterable() {
    let out = render_str(r#"<poml><i for="x in [1, 2, 3]">{{ x * 10 }} </i></poml>"#, &Context::new())
        .unwrap();
    assert_eq!(out, "10 20 30 ");
}

#[test]
fn non_sequence_renders_once() {
    let out = render_str(
        r#"<poml><p for="x in name">[{{ x }}]</p></poml>"#,
        &context! { "name" => "abc" },
    )
    .unwrap();
    assert_eq!(out, "[{{ x }}]");
}

#[test]
fn malformed_for_renders_once() {
    let out = render_str(
        r#"<poml><p for="items">plain</p></poml>"#,
        &context! { "items" => vec![1, 2] },
    )
    .unwrap();
    assert_eq!(out, "plain");
}

#[test]
fn undefined_iterable_aborts() {
    let err = render_str(r#"<poml><p for="x in missing">x</p></poml>"#, &Context::new())
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::Eval { ref attribute, .. } if attribute == "for"
    ));
}

#[test]
fn error_message_includes_suggestion() {
    let err = render_str(
        r#"<poml><p if="isVisble">x</p></poml>"#,
        &context! { "isVisible" => true },
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to evaluate if=\"isVisble\": 'isVisble' is not defined (did you mean: isVisible?)"
    );
}
