//! POML render engine.
//!
//! The engine walks an element tree and produces text. Elements contribute
//! only their children's output; attributes drive control flow:
//!
//! - `if="expr"` skips the element when the expression is falsy
//! - `for="item in expr"` renders the element once per sequence item, with
//!   `item` and `loop` (`index`, `first`, `last`, `length`) bound
//! - `<let name=".." value=".."/>` binds a variable for later siblings
//! - `<include src=".."/>` renders another document inline

mod context;
mod directive;
mod engine;
mod error;
mod interpolate;
mod loader;

pub use context::RenderContext;
pub use directive::{ForDirective, parse_for};
pub use engine::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NESTING, Renderer};
pub use error::RenderError;
pub use interpolate::interpolate;
pub use loader::{FsLoader, MemoryLoader, SourceLoader};
