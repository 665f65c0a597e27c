//! Tests for stylesheet extraction and application.

use poml::stylesheet::extract_stylesheet;
use poml::{Context, Node, ParseError, RenderError, context, parse, render_str};

// =========================================================================
// Extraction
// =========================================================================

#[test]
fn extracts_and_applies_tag_selector() {
    let mut root = parse(
        r#"<poml><stylesheet>{"p": {"syntax": "json"}}</stylesheet><p>data</p></poml>"#,
    )
    .unwrap();

    let stylesheet = extract_stylesheet(&mut root).unwrap().unwrap();
    stylesheet.apply(&mut root);

    assert_eq!(root.children.len(), 1);
    let p = root.child_elements().next().unwrap();
    assert_eq!(p.attr("syntax"), Some("json"));
}

#[test]
fn removal_keeps_sibling_order() {
    let mut root =
        parse(r#"<poml><a/><stylesheet>{}</stylesheet><b/><c/></poml>"#).unwrap();
    extract_stylesheet(&mut root).unwrap();

    let tags: Vec<&str> = root.child_elements().map(|e| e.tag.as_str()).collect();
    assert_eq!(tags, vec!["a", "b", "c"]);
}

#[test]
fn no_stylesheet_leaves_tree_unchanged() {
    let mut root = parse("<poml><p>x</p></poml>").unwrap();
    let before = root.clone();
    assert!(extract_stylesheet(&mut root).unwrap().is_none());
    assert_eq!(root, before);
}

#[test]
fn empty_stylesheet_is_removed() {
    let mut root = parse("<poml><stylesheet/><p>x</p></poml>").unwrap();
    let stylesheet = extract_stylesheet(&mut root).unwrap().unwrap();
    assert!(stylesheet.is_empty());
    assert_eq!(root.children.len(), 1);
}

#[test]
fn only_direct_children_are_considered() {
    let mut root =
        parse(r#"<poml><div><stylesheet>{"p": {"a": "1"}}</stylesheet></div></poml>"#).unwrap();
    assert!(extract_stylesheet(&mut root).unwrap().is_none());
}

#[test]
fn malformed_stylesheet_is_a_parse_error() {
    let err = render_str(
        r#"<poml><stylesheet>{"p": </stylesheet></poml>"#,
        &Context::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RenderError::Parse {
            path: None,
            source: ParseError::Stylesheet { .. }
        }
    ));
}

// =========================================================================
// Application
// =========================================================================

#[test]
fn class_selector_and_declaration_order() {
    let mut root = parse(
        r#"<poml>
            <stylesheet>{"p": {"speaker": "human", "tone": "plain"}, ".special": {"speaker": "ai"}}</stylesheet>
            <p>a</p>
            <p class="special">b</p>
            <div class="special"><p>c</p></div>
        </poml>"#,
    )
    .unwrap();
    let stylesheet = extract_stylesheet(&mut root).unwrap().unwrap();
    stylesheet.apply(&mut root);

    let elements: Vec<_> = root.child_elements().collect();
    assert_eq!(elements[0].attr("speaker"), Some("human"));
    assert_eq!(elements[1].attr("speaker"), Some("ai"));
    assert_eq!(elements[1].attr("tone"), Some("plain"));
    assert_eq!(elements[2].attr("speaker"), Some("ai"));
    assert_eq!(elements[2].attr("tone"), None);

    let nested = elements[2].child_elements().next().unwrap();
    assert_eq!(nested.attr("speaker"), Some("human"));
}

#[test]
fn root_is_styled() {
    let mut root = parse(r#"<poml><stylesheet>{"poml": {"lang": "en"}}</stylesheet></poml>"#).unwrap();
    let stylesheet = extract_stylesheet(&mut root).unwrap().unwrap();
    stylesheet.apply(&mut root);
    assert_eq!(root.attr("lang"), Some("en"));
}

#[test]
fn stylesheet_overwrites_existing_attributes() {
    let mut root =
        parse(r#"<poml><stylesheet>{"p": {"speaker": "ai"}}</stylesheet><p speaker="human"/></poml>"#)
            .unwrap();
    let stylesheet = extract_stylesheet(&mut root).unwrap().unwrap();
    stylesheet.apply(&mut root);
    assert!(matches!(
        &root.children[0],
        Node::Element(p) if p.attr("speaker") == Some("ai")
    ));
}

#[test]
fn applied_attributes_drive_rendering() {
    let out = render_str(
        r#"<poml>
            <stylesheet>{".secret": {"if": "admin"}}</stylesheet>
            <p>public </p>
            <p class="secret">secret</p>
        </poml>"#,
        &context! { "admin" => false },
    )
    .unwrap();
    assert_eq!(out, "public ");
}

#[test]
fn stylesheet_text_is_not_rendered() {
    let out = render_str(
        r#"<poml><stylesheet>{"p": {"x": "1"}}</stylesheet><p>only this</p></poml>"#,
        &Context::new(),
    )
    .unwrap();
    assert_eq!(out, "only this");
}
