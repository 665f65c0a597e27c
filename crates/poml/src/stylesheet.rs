//! Embedded stylesheets.
//!
//! A document may carry one `<stylesheet>` element as a direct child of its
//! root. Its text is a JSON object mapping selectors to attribute overrides:
//!
//! ```json
//! {
//!   "p": { "syntax": "json" },
//!   ".special": { "speaker": "ai" }
//! }
//! ```
//!
//! A selector is either a tag name or `.class`, which matches elements whose
//! `class` attribute equals `class` exactly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::parser::ParseError;
use crate::types::{Element, Node};

/// Tag name of the stylesheet element.
pub const STYLESHEET_TAG: &str = "stylesheet";

/// Selector-keyed attribute overrides, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stylesheet {
    rules: IndexMap<String, IndexMap<String, String>>,
}

impl Stylesheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stylesheet from its JSON source.
    pub fn from_json(source: &str) -> Result<Self, ParseError> {
        serde_json::from_str(source).map_err(|source| ParseError::Stylesheet { source })
    }

    /// Add a rule. Keys already present under the selector are overwritten.
    pub fn insert(
        &mut self,
        selector: impl Into<String>,
        attributes: impl IntoIterator<Item = (String, String)>,
    ) {
        self.rules
            .entry(selector.into())
            .or_default()
            .extend(attributes);
    }

    /// Get the attribute overrides declared for a selector.
    pub fn rule(&self, selector: &str) -> Option<&IndexMap<String, String>> {
        self.rules.get(selector)
    }

    /// Iterate over rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &IndexMap<String, String>)> {
        self.rules
            .iter()
            .map(|(selector, attributes)| (selector.as_str(), attributes))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every matching rule to `element` and all of its descendants.
    ///
    /// The traversal is pre-order and includes `element` itself. Rules are
    /// applied in declaration order, so a later rule overwrites a key set by
    /// an earlier one. Matching sees the attributes as they stand when the
    /// element is reached, including writes made by earlier rules.
    pub fn apply(&self, element: &mut Element) {
        if self.is_empty() {
            return;
        }
        self.apply_element(element);
    }

    fn apply_element(&self, element: &mut Element) {
        for (selector, attributes) in &self.rules {
            if Selector::parse(selector).matches(element) {
                trace!(selector = selector.as_str(), tag = element.tag.as_str(), "applying rule");
                for (key, value) in attributes {
                    element.set_attr(key.clone(), value.clone());
                }
            }
        }

        for child in &mut element.children {
            if let Node::Element(child) = child {
                self.apply_element(child);
            }
        }
    }
}

/// A parsed stylesheet selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Matches elements with this tag.
    Tag(&'a str),
    /// Matches elements whose `class` attribute equals this name.
    Class(&'a str),
}

impl<'a> Selector<'a> {
    pub fn parse(selector: &'a str) -> Self {
        match selector.strip_prefix('.') {
            Some(class) => Selector::Class(class),
            None => Selector::Tag(selector),
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Tag(tag) => element.tag == *tag,
            Selector::Class(class) => element.attr("class") == Some(*class),
        }
    }
}

/// Remove the stylesheet element from the root's direct children and parse it.
///
/// Returns `Ok(None)` and leaves the tree untouched when there is no
/// stylesheet. A stylesheet element without text yields an empty stylesheet;
/// it is removed either way.
pub fn extract_stylesheet(root: &mut Element) -> Result<Option<Stylesheet>, ParseError> {
    let Some(position) = root
        .children
        .iter()
        .position(|child| child.is_element(STYLESHEET_TAG))
    else {
        return Ok(None);
    };

    let removed = root.children.remove(position);
    let source = removed
        .as_element()
        .and_then(Element::first_text)
        .map(str::to_owned);

    let stylesheet = match source {
        Some(source) => Stylesheet::from_json(&source)?,
        None => Stylesheet::new(),
    };
    debug!(rules = stylesheet.len(), "extracted stylesheet");
    Ok(Some(stylesheet))
}
