//! # metatree-yaml
//!
//! YAML parsing with source location tracking.
//!
//! [`load`] drives `yaml-rust2`'s marked event interface and wraps every
//! scalar, sequence, and mapping it constructs as a [`Node`] carrying the
//! span the value occupies in the original text. Multi-document streams
//! collapse into a single root: zero documents become a null node, one
//! document passes through, and several become an array spanning the
//! stream.
//!
//! Custom (`!`-handle) tags resolve through the [`TagResolver`] seam;
//! [`load`] itself rejects them, and loaders with their own tag vocabulary
//! (such as the CloudFormation loader) install a resolver via
//! [`load_with`].
//!
//! ## Example
//!
//! ```rust
//! let yaml = metatree_yaml::load("test: 123").unwrap();
//!
//! assert_eq!(yaml.span.start.line, 1);
//! assert_eq!(yaml.span.end.column, 9);
//!
//! let value = yaml.get("test").unwrap();
//! assert_eq!(value.as_i64(), Some(123));
//! assert_eq!(value.span.start.column, 6);
//! ```

mod error;
mod parser;
mod resolver;
mod tags;

pub use error::{Error, Result};
pub use metatree_node::{Node, NodeData, NodeType, Position, Span};
pub use parser::{load, load_with};
pub use resolver::{RejectCustomTags, TagResolver, TaggedValue};
