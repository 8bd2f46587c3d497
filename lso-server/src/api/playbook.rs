//! Playbook API Handlers
//!
//! HTTP endpoint for launching playbook runs.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use lso_core::dto::playbook::{PlaybookLaunchResponse, RunPlaybookRequest};

use crate::api::AppState;
use crate::api::error::ApiResult;

/// POST /api/playbook/
/// Launch a playbook run; the outcome is delivered to the request's callback
pub async fn run_playbook(
    State(state): State<AppState>,
    payload: Result<Json<RunPlaybookRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PlaybookLaunchResponse>)> {
    let Json(req) = payload?;
    tracing::info!("Launching playbook: {}", req.playbook_name);

    let job_id = state.coordinator.launch_playbook(&req)?;

    Ok((
        StatusCode::CREATED,
        Json(PlaybookLaunchResponse {
            job_id,
            request: req,
        }),
    ))
}
