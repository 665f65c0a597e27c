//! End-to-end rendering of small documents.

use poml::{
    Context, Element, Node, RenderError, Renderer, Text, Value, context, render, render_str,
};

// =========================================================================
// Interpolation
// =========================================================================

#[test]
fn interpolates_context_variable() {
    let out = render_str("<poml><p>Hello, {{ name }}</p></poml>", &context! { "name" => "API" })
        .unwrap();
    assert_eq!(out, "Hello, API");
}

#[test]
fn interpolates_at_root() {
    let out =
        render_str("<poml>Hello, {{ name }}</poml>", &context! { "name" => "API" }).unwrap();
    assert_eq!(out, "Hello, API");
}

#[test]
fn interpolates_arithmetic_without_context() {
    let out = render_str("<poml>Result is {{ 1 + 2 }}</poml>", &Context::new()).unwrap();
    assert_eq!(out, "Result is 3");
}

#[test]
fn interpolates_expression() {
    let out = render_str(
        "<poml><p>Hello, {{ 'Wor' + 'ld' }}!</p></poml>",
        &Context::new(),
    )
    .unwrap();
    assert_eq!(out, "Hello, World!");
}

#[test]
fn failed_span_is_kept_and_others_still_render() {
    let out = render_str(
        "<poml><p>{{ missing }} and {{ name }}</p></poml>",
        &context! { "name" => "Ada" },
    )
    .unwrap();
    assert_eq!(out, "{{ missing }} and Ada");
}

#[test]
fn unclosed_span_is_literal() {
    let out = render_str("<poml><p>{{ name and more</p></poml>", &context! { "name" => "x" })
        .unwrap();
    assert_eq!(out, "{{ name and more");
}

#[test]
fn value_coercions_in_text() {
    let ctx = context! {
        "half" => 3.5,
        "whole" => 4,
        "items" => vec![1, 2, 3],
        "flag" => false,
        "nothing" => Value::Null,
    };
    let out = render_str(
        "<poml><p>{{ half }}|{{ whole }}|{{ items }}|{{ flag }}|{{ nothing }}|{{ 1 / 0 }}</p></poml>",
        &ctx,
    )
    .unwrap();
    assert_eq!(out, "3.5|4|1,2,3|false|null|Infinity");
}

// =========================================================================
// Tree shape
// =========================================================================

#[test]
fn document_without_control_flow_concatenates_text() {
    let out = render_str(
        r#"<poml>
            <p speaker="human">Hello <b>bold</b> world.</p>
            <p>Second</p>
        </poml>"#,
        &Context::new(),
    )
    .unwrap();
    assert_eq!(out, "Hello bold world.Second");
}

#[test]
fn internal_whitespace_is_preserved() {
    let out = render_str("<poml><p>  two  spaces  </p></poml>", &Context::new()).unwrap();
    assert_eq!(out, "  two  spaces  ");
}

#[test]
fn render_accepts_a_built_tree() {
    let root = Element::builder()
        .tag("poml")
        .children(vec![Node::Element(
            Element::builder()
                .tag("p")
                .children(vec![Node::Text(Text::new("Hi {{ who }}"))])
                .build(),
        )])
        .build();

    let out = render(root, &context! { "who" => "there" }).unwrap();
    assert_eq!(out, "Hi there");
}

#[test]
fn empty_root_renders_nothing() {
    let out = render_str("<poml/>", &Context::new()).unwrap();
    assert_eq!(out, "");
}

#[test]
fn context_is_not_mutated() {
    let ctx = context! { "a" => 1 };
    let before = ctx.clone();
    render_str(
        r#"<poml><let name="a" value="2"/><let name="b" value="3"/>{{ a }}</poml>"#,
        &ctx,
    )
    .unwrap();
    assert_eq!(ctx, before);
}

#[test]
fn rendering_is_deterministic() {
    let source = r#"<poml><p for="x in xs">{{ x }}</p></poml>"#;
    let ctx = context! { "xs" => vec!["a", "b"] };
    let first = render_str(source, &ctx).unwrap();
    let second = render_str(source, &ctx).unwrap();
    assert_eq!(first, second);
}

// =========================================================================
// Nesting
// =========================================================================

fn nested(depth: usize) -> String {
    format!("<poml>{}x{}</poml>", "<a>".repeat(depth), "</a>".repeat(depth))
}

#[test]
fn deep_nesting_is_an_error() {
    let err = render_str(&nested(1000), &Context::new()).unwrap_err();
    assert!(matches!(err, RenderError::MaxNestingExceeded { depth: 128 }));
}

#[test]
fn nesting_limit_is_configurable() {
    let renderer = Renderer::builder().max_nesting(4).build();
    assert_eq!(renderer.render_str(&nested(3), &Context::new()).unwrap(), "x");
    assert!(matches!(
        renderer.render_str(&nested(4), &Context::new()),
        Err(RenderError::MaxNestingExceeded { depth: 4 })
    ));
}
