//! Source positions for annotated nodes.

use serde::{Deserialize, Serialize};

/// A point in source text.
///
/// Lines are 1-based; columns are 0-based and counted in characters, not
/// bytes. The same convention holds for the JSON and YAML loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (0-based, in characters)
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The range a node occupies in source text.
///
/// `start` is inclusive; `end` is exclusive in columns (one past the last
/// character of the node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    /// Create a new span.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The zero-width span used for nodes synthesized from an empty stream.
    pub fn synthetic_empty() -> Self {
        Self {
            start: Position::new(1, 0),
            end: Position::new(1, 0),
        }
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}
