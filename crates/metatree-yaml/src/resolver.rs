//! Custom-tag resolution seam.
//!
//! The event builder handles the core schema itself; any other tag (the
//! `!`-handle family) is handed to a [`TagResolver`] together with the
//! already-constructed content of the tagged node and the node's span.
//! Loaders with a tag vocabulary of their own implement the trait and pass
//! themselves to [`load_with`](crate::load_with).

use crate::error::{Error, Result};
use metatree_node::{Node, Span};

/// The constructed content of a tagged node, as handed to a resolver.
#[derive(Debug)]
pub enum TaggedValue {
    /// The scalar text as written (escape processing already done by the
    /// engine).
    Scalar(String),
    /// The already-annotated child nodes of a tagged sequence.
    Sequence(Vec<Node>),
    /// The already-annotated entries of a tagged mapping, in source order.
    Mapping(Vec<(Node, Node)>),
}

impl TaggedValue {
    /// Shape name used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            TaggedValue::Scalar(_) => "scalar",
            TaggedValue::Sequence(_) => "sequence",
            TaggedValue::Mapping(_) => "mapping",
        }
    }
}

/// Resolves custom tags into nodes.
pub trait TagResolver {
    /// Resolve the tag `!{suffix}` applied to `value`.
    ///
    /// `span` is the tagged node's span; the returned node is used in the
    /// tree as-is and should carry it.
    fn resolve(&self, suffix: &str, value: TaggedValue, span: Span) -> Result<Node>;
}

/// The resolver behind [`load`](crate::load): rejects every custom tag,
/// like a safe loader with no registered constructors.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectCustomTags;

impl TagResolver for RejectCustomTags {
    fn resolve(&self, suffix: &str, _value: TaggedValue, span: Span) -> Result<Node> {
        Err(Error::UnresolvedTag {
            tag: suffix.to_string(),
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolver_rejects() {
        let err = RejectCustomTags
            .resolve(
                "Ref",
                TaggedValue::Scalar("x".into()),
                Span::synthetic_empty(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedTag { tag, .. } if tag == "Ref"));
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(TaggedValue::Scalar(String::new()).shape(), "scalar");
        assert_eq!(TaggedValue::Sequence(Vec::new()).shape(), "sequence");
        assert_eq!(TaggedValue::Mapping(Vec::new()).shape(), "mapping");
    }
}
