//! Unified error handling for the server.

use crate::session::SessionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::Session(SessionError::Engine(e)) => {
                tracing::debug!("Rejected input: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string(), None)
            }
            AppError::Session(SessionError::SyncInProgress) => (
                StatusCode::CONFLICT,
                "Sync already in progress".to_string(),
                None,
            ),
            AppError::Session(SessionError::Remote(e)) => {
                tracing::warn!("Remote error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Sync failed".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Session(SessionError::Slot(e)) => {
                tracing::error!("Slot error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                    None,
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
