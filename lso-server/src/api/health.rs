//! Health and Version API Handlers
//!
//! Liveness probe and API version reporting.

use axum::{Json, http::StatusCode, response::IntoResponse};
use lso_core::dto::version::{API_VERSION, Version};

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /api/version
/// Reports the API contract version and the server build
pub async fn version() -> Json<Version> {
    Json(Version {
        api: API_VERSION.to_string(),
        module: env!("CARGO_PKG_VERSION").to_string(),
    })
}
