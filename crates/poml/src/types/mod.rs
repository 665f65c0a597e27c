mod node;
mod scope;
mod value;

pub use node::{Element, Node, Text};
pub use scope::{Context, Scope};
pub use value::Value;
