//! # metatree-node
//!
//! The position-annotated node model shared by the JSON and YAML loaders.
//!
//! Every value decoded from a source document is wrapped in a [`Node`] that
//! carries the decoded payload, a [`NodeType`] tag, and the [`Span`] the
//! value occupies in the original text. Object payloads are keyed by the
//! *key nodes themselves*, so a consumer can report the position of a key
//! independently of its value.
//!
//! ## Example
//!
//! ```rust
//! use metatree_node::{Node, NodeData, NodeType, Position, Span};
//!
//! let span = Span::new(Position::new(1, 6), Position::new(1, 9));
//! let node = Node::new(NodeData::Int(123), NodeType::Number, span);
//!
//! assert_eq!(node.as_i64(), Some(123));
//! assert_eq!(node.span.start.column, 6);
//! assert_eq!(node.raw(), serde_json::json!(123));
//! ```

mod node;
mod span;

pub use node::{Node, NodeData, NodeType};
pub use span::{Position, Span};
