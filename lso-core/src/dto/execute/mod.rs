//! Executable run DTOs

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::job::JobId;
use crate::dto::{require_non_empty, validate_callback};
use crate::error::ValidationError;

/// Request to run an executable from the executables root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunExecutableRequest {
    pub executable_name: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub callback: Url,
}

impl RunExecutableRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("executable_name", &self.executable_name)?;
        validate_callback(&self.callback)
    }
}

/// Response for an accepted executable run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutableLaunchResponse {
    pub job_id: JobId,
    #[serde(flatten)]
    pub request: RunExecutableRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_to_empty() {
        let req: RunExecutableRequest = serde_json::from_value(serde_json::json!({
            "executable_name": "check.sh",
            "callback": "http://localhost/cb",
        }))
        .unwrap();

        assert!(req.args.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_executable_name_is_invalid() {
        let req: RunExecutableRequest = serde_json::from_value(serde_json::json!({
            "executable_name": " ",
            "args": ["--verbose"],
            "callback": "http://localhost/cb",
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }
}
