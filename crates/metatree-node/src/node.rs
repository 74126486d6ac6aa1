//! The position-annotated value tree.

use crate::Span;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// Data-type tag for a [`Node`].
///
/// The JSON builder emits the split `True`/`False` tags; the YAML builder
/// emits the unified `Boolean` plus the YAML-only `Binary` and `Datetime`
/// tags. The set is closed: loaders never produce anything outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// An array: `[]`
    Array,
    /// An object/mapping: `{}`
    Object,
    /// A string scalar
    String,
    /// An integer or float scalar
    Number,
    /// A null scalar
    Null,
    /// The JSON literal `true`
    True,
    /// The JSON literal `false`
    False,
    /// A YAML boolean scalar
    Boolean,
    /// A YAML `!!binary` scalar
    Binary,
    /// A YAML `!!timestamp` scalar
    Datetime,
}

/// Decoded payload of a [`Node`].
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Null payload
    Null,
    /// Boolean payload
    Bool(bool),
    /// Integer payload
    Int(i64),
    /// Float payload
    Float(f64),
    /// String payload
    String(String),
    /// Decoded `!!binary` payload
    Binary(Vec<u8>),
    /// Canonical text of a `!!timestamp` scalar
    Datetime(String),
    /// Ordered sequence of child nodes
    Array(Vec<Node>),
    /// Mapping from key nodes to value nodes, insertion order preserved
    Object(IndexMap<Node, Node>),
}

/// An immutable value decoded from a source document, annotated with the
/// span it occupies in the original text.
///
/// A `Node` is a pure value: two nodes with equal data, type, and span are
/// equal and interchangeable, which is what lets key nodes serve as mapping
/// keys. Nodes are built bottom-up during a single parse pass and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Node {
    /// The decoded payload.
    pub data: NodeData,
    /// The data-type tag.
    pub data_type: NodeType,
    /// Where the value sits in the original source.
    pub span: Span,
}

impl Node {
    /// Create a new node.
    pub fn new(data: NodeData, data_type: NodeType, span: Span) -> Self {
        Self {
            data,
            data_type,
            span,
        }
    }

    /// The null node synthesized for an empty document stream.
    pub fn empty_stream() -> Self {
        Self::new(NodeData::Null, NodeType::Null, Span::synthetic_empty())
    }

    /// Check if this is a mapping/object node.
    pub fn is_object(&self) -> bool {
        matches!(self.data, NodeData::Object(_))
    }

    /// Check if this is a sequence/array node.
    pub fn is_array(&self) -> bool {
        matches!(self.data, NodeData::Array(_))
    }

    /// Check if this is a scalar node (neither array nor object).
    pub fn is_scalar(&self) -> bool {
        !self.is_object() && !self.is_array()
    }

    /// Get the string payload if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            NodeData::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer payload if this is an integer scalar.
    pub fn as_i64(&self) -> Option<i64> {
        match self.data {
            NodeData::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Get the float payload if this is a numeric scalar.
    pub fn as_f64(&self) -> Option<f64> {
        match self.data {
            NodeData::Int(i) => Some(i as f64),
            NodeData::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Get the boolean payload if this is a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            NodeData::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Get the child nodes if this is an array.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.data {
            NodeData::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get the entry map if this is an object.
    pub fn as_mapping(&self) -> Option<&IndexMap<Node, Node>> {
        match &self.data {
            NodeData::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up an object entry by the raw text of its key.
    ///
    /// Returns the *value node*, preserving its position metadata. Returns
    /// `None` if this is not an object or no key matches.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match &self.data {
            NodeData::Object(map) => map
                .iter()
                .find_map(|(k, v)| (k.as_str() == Some(key)).then_some(v)),
            _ => None,
        }
    }

    /// Number of children (array length or object entry count).
    pub fn len(&self) -> usize {
        match &self.data {
            NodeData::Array(items) => items.len(),
            NodeData::Object(map) => map.len(),
            _ => 0,
        }
    }

    /// Check if this node has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Strip all node wrappers, producing the plain decoded value.
    ///
    /// Object keys render through their scalar text; `Binary` payloads
    /// re-encode to base64 and `Datetime` payloads keep their canonical
    /// text, so the result is always JSON-representable. For a valid JSON
    /// input this equals what `serde_json` decodes from the same text.
    pub fn raw(&self) -> Value {
        match &self.data {
            NodeData::Null => Value::Null,
            NodeData::Bool(b) => Value::from(*b),
            NodeData::Int(i) => Value::from(*i),
            NodeData::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            NodeData::String(s) => Value::from(s.clone()),
            NodeData::Binary(bytes) => Value::from(BASE64.encode(bytes)),
            NodeData::Datetime(s) => Value::from(s.clone()),
            NodeData::Array(items) => Value::Array(items.iter().map(Node::raw).collect()),
            NodeData::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.key_text(), value.raw());
                }
                Value::Object(out)
            }
        }
    }

    /// The text form of this node when used as a mapping key.
    pub fn key_text(&self) -> String {
        match &self.data {
            NodeData::String(s) => s.clone(),
            NodeData::Datetime(s) => s.clone(),
            NodeData::Bool(b) => b.to_string(),
            NodeData::Int(i) => i.to_string(),
            NodeData::Float(f) => f.to_string(),
            NodeData::Null => "null".to_string(),
            NodeData::Binary(bytes) => BASE64.encode(bytes),
            // Complex keys are legal YAML; fall back to their JSON text.
            NodeData::Array(_) | NodeData::Object(_) => self.raw().to_string(),
        }
    }
}

// Equality and hashing are structural over data, type, and span. Floats
// compare and hash by bit pattern so the two stay consistent and `Node`
// can serve as an `IndexMap` key. Object payloads compare entry by entry
// in insertion order, which is part of the value.

impl PartialEq for NodeData {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeData::Null, NodeData::Null) => true,
            (NodeData::Bool(a), NodeData::Bool(b)) => a == b,
            (NodeData::Int(a), NodeData::Int(b)) => a == b,
            (NodeData::Float(a), NodeData::Float(b)) => a.to_bits() == b.to_bits(),
            (NodeData::String(a), NodeData::String(b)) => a == b,
            (NodeData::Binary(a), NodeData::Binary(b)) => a == b,
            (NodeData::Datetime(a), NodeData::Datetime(b)) => a == b,
            (NodeData::Array(a), NodeData::Array(b)) => a == b,
            (NodeData::Object(a), NodeData::Object(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            _ => false,
        }
    }
}

impl Eq for NodeData {}

impl Hash for NodeData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            NodeData::Null => {}
            NodeData::Bool(b) => b.hash(state),
            NodeData::Int(i) => i.hash(state),
            NodeData::Float(f) => f.to_bits().hash(state),
            NodeData::String(s) => s.hash(state),
            NodeData::Binary(bytes) => bytes.hash(state),
            NodeData::Datetime(s) => s.hash(state),
            NodeData::Array(items) => items.hash(state),
            NodeData::Object(map) => {
                map.len().hash(state);
                for (key, value) in map {
                    key.hash(state);
                    value.hash(state);
                }
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type && self.span == other.span && self.data == other.data
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data_type.hash(state);
        self.span.hash(state);
        self.data.hash(state);
    }
}
