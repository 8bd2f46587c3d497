//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lso_core::dto::error::ErrorBody;

use crate::service::coordinator::LaunchError;
use crate::service::resolver::ResolveError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Forbidden(String),
    Unprocessable(String),
    InternalError(String),
}

impl ApiError {
    fn status_and_reason(self) -> (StatusCode, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reason) = self.status_and_reason();
        let body = ErrorBody {
            reason,
            status_code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl From<LaunchError> for ApiError {
    fn from(err: LaunchError) -> Self {
        match err {
            LaunchError::Invalid(e) => ApiError::Unprocessable(e.to_string()),
            LaunchError::PlaybookNotFound(e) => ApiError::BadRequest(e.to_string()),
            LaunchError::ExecutableRejected(e @ ResolveError::NotExecutable(_)) => {
                ApiError::Forbidden(e.to_string())
            }
            LaunchError::ExecutableRejected(
                e @ (ResolveError::NotFound(_) | ResolveError::NotAFile(_)),
            ) => ApiError::NotFound(e.to_string()),
            LaunchError::ExecutableRejected(e) => ApiError::BadRequest(e.to_string()),
            err @ LaunchError::ExecutablesDisabled => ApiError::NotFound(err.to_string()),
            LaunchError::Command(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    async fn body_of(err: ApiError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_body_carries_reason_and_status_code() {
        let (status, body) = body_of(ApiError::BadRequest("nope".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            ErrorBody {
                reason: "nope".to_string(),
                status_code: 400
            }
        );
    }

    #[tokio::test]
    async fn test_launch_errors_map_to_status_codes() {
        let not_found = LaunchError::PlaybookNotFound(ResolveError::NotFound(PathBuf::from(
            "/srv/playbooks/deploy.yml",
        )));
        let (status, body) = body_of(not_found.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.reason,
            "Filename '/srv/playbooks/deploy.yml' does not exist."
        );

        let not_executable =
            LaunchError::ExecutableRejected(ResolveError::NotExecutable(PathBuf::from("x.sh")));
        let (status, _) = body_of(not_executable.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let missing =
            LaunchError::ExecutableRejected(ResolveError::NotFound(PathBuf::from("x.sh")));
        let (status, _) = body_of(missing.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let directory =
            LaunchError::ExecutableRejected(ResolveError::NotAFile(PathBuf::from("bin")));
        let (status, _) = body_of(directory.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let escape = LaunchError::ExecutableRejected(ResolveError::OutsideRoot("../x".into()));
        let (status, _) = body_of(escape.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = body_of(LaunchError::ExecutablesDisabled.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.status_code, 404);

        let invalid = LaunchError::Invalid(lso_core::ValidationError::Empty {
            field: "playbook_name",
        });
        let (status, _) = body_of(invalid.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
