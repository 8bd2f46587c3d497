//! Data Transfer Objects for the HTTP API
//!
//! Request bodies accepted by the server and the response bodies it returns.

pub mod error;
pub mod execute;
pub mod playbook;
pub mod version;

use url::Url;

use crate::error::ValidationError;

/// Checks that a callback is an absolute http(s) URL with a host
pub fn validate_callback(callback: &Url) -> Result<(), ValidationError> {
    let reject = |reason: &str| ValidationError::Callback {
        url: callback.to_string(),
        reason: reason.to_string(),
    };

    match callback.scheme() {
        "http" | "https" => {}
        other => return Err(reject(&format!("scheme '{}' is not allowed", other))),
    }

    if callback.host_str().is_none_or(str::is_empty) {
        return Err(reject("missing host"));
    }

    Ok(())
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}
