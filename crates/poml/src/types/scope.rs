use std::collections::HashMap;

use super::Value;

/// The variable context a caller passes to a render.
pub type Context = HashMap<String, Value>;

/// Variable bindings visible at one point of a render.
///
/// A scope is never shared mutably across a lexical boundary. Entering an
/// element body, a `for` iteration or a `let` sequence calls [`Scope::fork`],
/// which yields an independent copy: bindings made in the fork are invisible
/// to the parent and to siblings.
///
/// # Example
///
/// ```
/// use poml::{Scope, Value};
///
/// let mut parent = Scope::new();
/// parent.bind("name", "outer");
///
/// let mut child = parent.fork();
/// child.bind("name", "inner");
///
/// assert_eq!(parent.get("name"), Some(&Value::from("outer")));
/// assert_eq!(child.get("name"), Some(&Value::from("inner")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    bindings: HashMap<String, Value>,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the root scope of a render from the caller's context.
    pub fn from_context(context: &Context) -> Self {
        Self {
            bindings: context.clone(),
        }
    }

    /// Create an independent child scope inheriting every binding.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Bind a name, shadowing any inherited binding.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(name.into(), value.into());
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Check if a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All bound names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl From<Context> for Scope {
    fn from(bindings: Context) -> Self {
        Self { bindings }
    }
}
