//! Error response DTO

use serde::{Deserialize, Serialize};

/// Body of every error response returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub reason: String,
    pub status_code: u16,
}
