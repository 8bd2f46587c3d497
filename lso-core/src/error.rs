//! Validation errors for inbound requests

use thiserror::Error;

/// A run request that is structurally well-formed JSON but not acceptable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required string field is empty
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// The inventory does not match any accepted shape
    #[error("invalid inventory: {0}")]
    Inventory(String),

    /// The callback is not an absolute http(s) URL
    #[error("invalid callback url '{url}': {reason}")]
    Callback { url: String, reason: String },
}
