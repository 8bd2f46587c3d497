//! Playbook run DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use url::Url;

use crate::domain::inventory::Inventory;
use crate::domain::job::JobId;
use crate::dto::{require_non_empty, validate_callback};
use crate::error::ValidationError;

/// Request to run a playbook against an inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPlaybookRequest {
    /// File name of the playbook, relative to the playbook root
    pub playbook_name: String,
    pub inventory: Inventory,
    /// Passed through to the playbook untouched
    #[serde(default)]
    pub extra_vars: HashMap<String, JsonValue>,
    /// Where the outcome is POSTed once the run finishes
    pub callback: Url,
}

impl RunPlaybookRequest {
    /// Field checks that go beyond what deserialization enforces
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("playbook_name", &self.playbook_name)?;
        validate_callback(&self.callback)
    }
}

/// Response for an accepted playbook run
///
/// Echoes the accepted parameters next to the job id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookLaunchResponse {
    pub job_id: JobId,
    #[serde(flatten)]
    pub request: RunPlaybookRequest,
}
