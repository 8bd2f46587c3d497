//! Executable API Handlers
//!
//! HTTP endpoint for launching arbitrary executables from the configured
//! executables directory.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use lso_core::dto::execute::{ExecutableLaunchResponse, RunExecutableRequest};

use crate::api::AppState;
use crate::api::error::ApiResult;

/// POST /api/execute/
/// Launch an executable run; the outcome is delivered to the request's callback
pub async fn run_executable(
    State(state): State<AppState>,
    payload: Result<Json<RunExecutableRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ExecutableLaunchResponse>)> {
    let Json(req) = payload?;
    tracing::info!("Launching executable: {}", req.executable_name);

    let job_id = state.coordinator.launch_executable(&req)?;

    Ok((
        StatusCode::CREATED,
        Json(ExecutableLaunchResponse {
            job_id,
            request: req,
        }),
    ))
}
