//! Markup parser using quick-xml.
//!
//! Builds the element tree consumed by the renderer:
//! - The first start tag becomes the root; anything after it closes is ignored
//! - Attribute values are unescaped and keyed by local name
//! - Adjacent text, entity references and CDATA merge into one text run
//! - Whitespace-only runs are dropped, other runs are kept verbatim
//! - Comments, processing instructions, declarations and DOCTYPE are skipped

use std::{mem, str};

use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

use super::error::{ParseError, calculate_position};
use crate::types::{Element, Node, Text};

/// Parse a POML document into its root element.
///
/// # Example
///
/// ```
/// use poml::parser::parse;
///
/// let root = parse(r#"<poml><p speaker="human">Hello</p></poml>"#).unwrap();
/// assert_eq!(root.tag, "poml");
/// let p = root.child_elements().next().unwrap();
/// assert_eq!(p.attr("speaker"), Some("human"));
/// assert_eq!(p.first_text(), Some("Hello"));
/// ```
pub fn parse(input: &str) -> Result<Element, ParseError> {
    trace!(input_len = input.len(), "parsing markup");

    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut pending = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| syntax_error(input, reader.error_position(), e.to_string()))?;
        let offset = reader.buffer_position();

        match event {
            Event::Start(start) => {
                flush_text(&mut pending, &mut stack);
                stack.push(open_element(&start, input, offset)?);
            }
            Event::Empty(start) => {
                flush_text(&mut pending, &mut stack);
                let element = open_element(&start, input, offset)?;
                if let Some(root) = close_element(&mut stack, element) {
                    return Ok(root);
                }
            }
            Event::End(_) => {
                flush_text(&mut pending, &mut stack);
                let Some(element) = stack.pop() else {
                    return Err(syntax_error(input, offset, "unexpected closing tag".into()));
                };
                if let Some(root) = close_element(&mut stack, element) {
                    return Ok(root);
                }
            }
            Event::Text(text) => {
                if !stack.is_empty() {
                    let decoded = text
                        .decode()
                        .map_err(|e| syntax_error(input, offset, e.to_string()))?;
                    pending.push_str(&decoded);
                }
            }
            Event::CData(data) => {
                if !stack.is_empty() {
                    let text = str::from_utf8(data.as_ref()).map_err(|_| ParseError::InvalidUtf8)?;
                    pending.push_str(text);
                }
            }
            Event::GeneralRef(reference) => {
                if !stack.is_empty() {
                    let raw = reference
                        .decode()
                        .map_err(|e| syntax_error(input, offset, e.to_string()))?;
                    pending.push_str(&resolve_entity(&raw, input, offset)?);
                }
            }
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => {
                if stack.is_empty() {
                    return Err(ParseError::NoRootElement);
                }
                let (line, column) = calculate_position(input, input.len());
                return Err(ParseError::UnexpectedEof { line, column });
            }
        }
    }
}

/// Parse a POML document from raw bytes, which must be UTF-8.
pub fn parse_bytes(input: &[u8]) -> Result<Element, ParseError> {
    let text = str::from_utf8(input).map_err(|_| ParseError::InvalidUtf8)?;
    parse(text)
}

fn syntax_error(input: &str, offset: u64, message: String) -> ParseError {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let (line, column) = calculate_position(input, offset);
    ParseError::Syntax {
        line,
        column,
        message,
    }
}

/// Build an element from a start tag, collecting its attributes.
fn open_element(start: &BytesStart<'_>, input: &str, offset: u64) -> Result<Element, ParseError> {
    let local_name = start.local_name();
    let tag = str::from_utf8(local_name.as_ref()).map_err(|_| ParseError::InvalidUtf8)?;
    let mut element = Element::new(tag);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| syntax_error(input, offset, e.to_string()))?;
        let key = attr.key.local_name();
        let name = str::from_utf8(key.as_ref()).map_err(|_| ParseError::InvalidUtf8)?;
        let value = attr
            .unescape_value()
            .map_err(|e| syntax_error(input, offset, e.to_string()))?;
        element.set_attr(name, value.into_owned());
    }

    Ok(element)
}

/// Attach a finished element to its parent, or return it when it is the root.
fn close_element(stack: &mut Vec<Element>, element: Element) -> Option<Element> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push(element);
            None
        }
        None => Some(element),
    }
}

/// Move the accumulated text run into the current element.
fn flush_text(pending: &mut String, stack: &mut [Element]) {
    if pending.is_empty() {
        return;
    }
    let content = mem::take(pending);
    if content.trim().is_empty() {
        return;
    }
    if let Some(current) = stack.last_mut() {
        current.push(Node::Text(Text::new(content)));
    }
}

fn resolve_entity(raw: &str, input: &str, offset: u64) -> Result<String, ParseError> {
    if let Some(resolved) = resolve_xml_entity(raw) {
        return Ok(resolved.into());
    }

    if let Some(rest) = raw.strip_prefix('#') {
        let code = if let Some(hex) = rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()
        } else {
            rest.parse::<u32>().ok()
        };
        return code
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| syntax_error(input, offset, format!("invalid character reference: &{raw};")));
    }

    // Custom entities are not resolved; keep them as written.
    Ok(format!("&{raw};"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_references_merge_into_one_run() {
        let root = parse("<poml>a &lt; b &#38; c</poml>").unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.first_text(), Some("a < b & c"));
    }

    #[test]
    fn unknown_entity_is_kept_verbatim() {
        let root = parse("<poml>&custom;</poml>").unwrap();
        assert_eq!(root.first_text(), Some("&custom;"));
    }

    #[test]
    fn cdata_is_text() {
        let root = parse("<poml><![CDATA[{{ a < b }}]]></poml>").unwrap();
        assert_eq!(root.first_text(), Some("{{ a < b }}"));
    }
}
