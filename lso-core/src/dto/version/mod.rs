//! Version DTO

use serde::{Deserialize, Serialize};

/// Version of the HTTP API contract
pub const API_VERSION: &str = "0.1";

/// Versions of the API and of the serving module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub api: String,
    pub module: String,
}
