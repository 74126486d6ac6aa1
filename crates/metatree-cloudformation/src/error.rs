//! Error types for CloudFormation template loading.

use thiserror::Error;

/// Result type alias for metatree-cloudformation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a CloudFormation template.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The `format` argument was not one of `json`, `yaml`, `yml`.
    #[error("unsupported template format `{format}`")]
    UnsupportedFormat { format: String },

    /// Error from the YAML loader, including intrinsic-tag resolution
    /// failures such as an unsupported node shape under `!GetAtt`.
    #[error(transparent)]
    Yaml(#[from] metatree_yaml::Error),

    /// Error from the JSON loader.
    #[error(transparent)]
    Json(#[from] metatree_json::Error),
}
