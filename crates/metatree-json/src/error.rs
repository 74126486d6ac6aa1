//! Error types for JSON loading.

use metatree_node::Position;
use thiserror::Error;

/// Result type alias for metatree-json operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed JSON. Carries the engine's diagnostic and the position it
    /// was reported at. Recoverable by the caller; retrying is pointless.
    #[error("unable to parse stream: {message} at line {line}, column {column}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// A grammar label showed up where the builder cannot place it. This is
    /// a coverage gap in the loader itself, not a caller error; propagate it.
    #[error("unexpected `{label}` node in value position")]
    UnexpectedSyntax { label: &'static str },
}

impl Error {
    pub(crate) fn parse(message: impl Into<String>, at: Position) -> Self {
        Error::Parse {
            message: message.into(),
            line: at.line,
            column: at.column,
        }
    }
}
