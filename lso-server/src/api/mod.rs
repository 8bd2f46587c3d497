//! API Module
//!
//! HTTP API layer for the service.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod execute;
pub mod health;
pub mod playbook;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::coordinator::RunCoordinator;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<RunCoordinator>,
}

impl AppState {
    pub fn new(coordinator: RunCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/api/version", get(health::version))
        // Run endpoints
        .route("/api/playbook", post(playbook::run_playbook))
        .route("/api/playbook/", post(playbook::run_playbook))
        .route("/api/execute", post(execute::run_executable))
        .route("/api/execute/", post(execute::run_executable))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
