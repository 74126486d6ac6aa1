//! # metatree-cloudformation
//!
//! CloudFormation template loading with source location tracking.
//!
//! Templates come in JSON or YAML flavor; [`load`] dispatches on the
//! `format` argument and returns the same position-annotated [`Node`] tree
//! either way. On the YAML path, intrinsic-function short tags (`!Ref`,
//! `!GetAtt`, `!Join`, …) resolve to their long-form mapping
//! representation `{"Fn::X": …}` while keeping the tagged node's span.
//!
//! ## Example
//!
//! ```rust
//! let template = metatree_cloudformation::load(
//!     "Description: !Ref 'AWS::StackName'",
//!     "yaml",
//! )
//! .unwrap();
//!
//! let value = template.get("Description").unwrap();
//! assert_eq!(value.raw(), serde_json::json!({"Ref": "AWS::StackName"}));
//! ```

mod error;
mod resolver;

use tracing::debug;

pub use error::{Error, Result};
pub use metatree_node::{Node, NodeData, NodeType, Position, Span};
pub use resolver::IntrinsicTags;

/// Load a CloudFormation template in the given format.
///
/// `format` must be one of `json`, `yaml`, or `yml`; anything else is
/// [`Error::UnsupportedFormat`] — a coverage gap on the caller's side, not
/// a malformed template.
///
/// # Errors
///
/// Returns the underlying loader's parse error for malformed input, and
/// [`Error::UnsupportedFormat`] for an unrecognized format string.
pub fn load(text: &str, format: &str) -> Result<Node> {
    debug!(format, "loading cloudformation template");
    match format {
        "yaml" | "yml" => Ok(metatree_yaml::load_with(text, &IntrinsicTags)?),
        "json" => Ok(metatree_json::load(text)?),
        other => Err(Error::UnsupportedFormat {
            format: other.to_string(),
        }),
    }
}
