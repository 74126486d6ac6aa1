//! Error types for YAML loading.

use metatree_node::Span;
use thiserror::Error;

/// Result type alias for metatree-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a YAML document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed YAML. Wraps the engine's diagnostic text verbatim.
    #[error("unable to parse stream: {message}")]
    Parse { message: String },

    /// A scalar could not be constructed under its tag (e.g. `!!int` on
    /// text that is not an integer).
    #[error(
        "cannot construct `!!{tag}` at line {}, column {}: {message}",
        .span.start.line,
        .span.start.column
    )]
    Construct {
        tag: String,
        message: String,
        span: Span,
    },

    /// An alias referenced an anchor that was never defined.
    #[error(
        "unknown anchor referenced at line {}, column {}",
        .span.start.line,
        .span.start.column
    )]
    UnknownAnchor { span: Span },

    /// A custom tag reached a loader with no resolver able to handle it.
    #[error(
        "could not determine a constructor for the tag `!{tag}` at line {}, column {}",
        .span.start.line,
        .span.start.column
    )]
    UnresolvedTag { tag: String, span: Span },

    /// A tag was applied to a node shape its resolver cannot handle. This
    /// is a coverage gap in the resolver, not a caller error; propagate it.
    #[error("unsupported node shape `{shape}` under tag `!{tag}`")]
    UnsupportedNodeShape { tag: String, shape: &'static str },
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::Parse {
            message: err.to_string(),
        }
    }
}
