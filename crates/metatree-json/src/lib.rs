//! # metatree-json
//!
//! JSON parsing with source location tracking.
//!
//! [`load`] parses a JSON document into a [`Node`] tree where every value —
//! including every object key — carries the span it occupies in the original
//! text. Downstream analyzers use the spans to report errors against the
//! source document instead of the decoded value.
//!
//! The crate is split the way the loading pipeline is: a lexer and
//! recursive-descent parser produce a labeled parse tree with raw lexemes
//! and spans, and a builder transforms that tree into nodes, decoding
//! string escapes and number literals along the way.
//!
//! ## Example
//!
//! ```rust
//! let json = metatree_json::load("{\n    \"test\": 123\n}").unwrap();
//!
//! assert_eq!(json.span.start.line, 1);
//! assert_eq!(json.span.end.line, 3);
//!
//! let value = json.get("test").unwrap();
//! assert_eq!(value.as_i64(), Some(123));
//! assert_eq!(value.span.start.column, 12);
//! ```

mod builder;
mod error;
mod lexer;
mod parser;

pub use builder::load;
pub use error::{Error, Result};
pub use metatree_node::{Node, NodeData, NodeType, Position, Span};
