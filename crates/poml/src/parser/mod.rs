//! POML markup and interpolation parsers.
//!
//! This module turns document source into the element tree, and text content
//! into literal and `{{ ... }}` segments.

pub mod ast;
pub mod error;
mod markup;
mod template;

pub use ast::*;
pub use error::ParseError;
pub use markup::{parse, parse_bytes};
pub use template::{CLOSE_DELIMITER, OPEN_DELIMITER, parse_template};
