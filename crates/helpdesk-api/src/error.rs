use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use helpdesk_db::StoreError;

/// Boundary error: every failure becomes a user-visible message with the
/// matching status code. Storage details are logged, never returned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("internal error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(StoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::DuplicateIdentity) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            ApiError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Storage(detail)) => {
                error!("storage error: {detail}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(detail) => {
                error!("internal error: {detail}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub(crate) fn join_err(e: tokio::task::JoinError) -> ApiError {
    ApiError::Internal(format!("blocking task failed: {e}"))
}
