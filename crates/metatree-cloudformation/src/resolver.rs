//! Intrinsic-function tag resolution.
//!
//! CloudFormation's YAML flavor abbreviates intrinsic functions as custom
//! tags: `!Ref x` stands for `{"Ref": "x"}`, `!Join [...]` for
//! `{"Fn::Join": [...]}`, and so on. The resolver rewrites each short tag
//! to its long name and wraps the tagged node's constructed content as a
//! one-entry mapping carrying the tagged node's span.

use indexmap::IndexMap;
use metatree_node::{Node, NodeData, NodeType, Span};
use metatree_yaml::{TagResolver, TaggedValue};
use tracing::trace;

/// Resolver for the CloudFormation intrinsic-function tag family.
///
/// Installed by [`load`](crate::load) on the YAML path; usable directly
/// with [`metatree_yaml::load_with`] when a caller wants the YAML loader's
/// API with intrinsic tags enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrinsicTags;

impl TagResolver for IntrinsicTags {
    fn resolve(&self, suffix: &str, value: TaggedValue, span: Span) -> metatree_yaml::Result<Node> {
        let name = long_name(suffix);
        trace!(tag = suffix, shape = value.shape(), "resolving intrinsic tag");

        let resolved = if name == "Fn::GetAtt" {
            construct_getatt(value, span)?
        } else {
            match value {
                TaggedValue::Scalar(text) => {
                    Node::new(NodeData::String(text), NodeType::String, span)
                }
                TaggedValue::Sequence(items) => {
                    Node::new(NodeData::Array(items), NodeType::Array, span)
                }
                TaggedValue::Mapping(entries) => {
                    let map: IndexMap<Node, Node> = entries.into_iter().collect();
                    Node::new(NodeData::Object(map), NodeType::Object, span)
                }
            }
        };

        Ok(wrap_long_form(name, resolved, span))
    }
}

/// `Ref` and `Condition` keep their short names; every other tag takes the
/// `Fn::` prefix.
fn long_name(suffix: &str) -> String {
    match suffix {
        "Ref" | "Condition" => suffix.to_string(),
        other => format!("Fn::{other}"),
    }
}

/// Wrap a resolved value as `{long_name: value}`. The key is a synthetic
/// string node carrying the tagged node's span, so key lookups and key
/// diagnostics behave like any other mapping entry.
fn wrap_long_form(name: String, value: Node, span: Span) -> Node {
    let key = Node::new(NodeData::String(name), NodeType::String, span);
    let mut map = IndexMap::with_capacity(1);
    map.insert(key, value);
    Node::new(NodeData::Object(map), NodeType::Object, span)
}

/// `!GetAtt logicalId.attribute` splits on the first `.`; the sequence
/// form `!GetAtt [logicalId, attribute]` takes its elements as-is. A
/// mapping under `!GetAtt` has no meaning.
fn construct_getatt(value: TaggedValue, span: Span) -> metatree_yaml::Result<Node> {
    match value {
        TaggedValue::Scalar(text) => {
            let parts = match text.split_once('.') {
                Some((logical_id, attribute)) => vec![logical_id, attribute],
                None => vec![text.as_str()],
            };
            let items = parts
                .into_iter()
                .map(|part| Node::new(NodeData::String(part.to_string()), NodeType::String, span))
                .collect();
            Ok(Node::new(NodeData::Array(items), NodeType::Array, span))
        }
        TaggedValue::Sequence(items) => {
            Ok(Node::new(NodeData::Array(items), NodeType::Array, span))
        }
        other => Err(metatree_yaml::Error::UnsupportedNodeShape {
            tag: "GetAtt".to_string(),
            shape: other.shape(),
        }),
    }
}
