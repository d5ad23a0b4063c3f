//! Error types for ctat-ui
//!
//! Every failure is rendered as a JSON body the page shows as a transient
//! status message. `severity` picks the message style.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Annotation core error
    #[error(transparent)]
    Common(#[from] ctat_common::Error),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, &'static str) {
        use ctat_common::Error as E;

        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", "error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "error"),
            ApiError::Common(err) => match err {
                E::InvalidFileType(_) => (StatusCode::BAD_REQUEST, "INVALID_FILE_TYPE", "error"),
                E::FileRead(_) => (StatusCode::UNPROCESSABLE_ENTITY, "FILE_READ", "error"),
                E::EmptyInput => (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_INPUT", "error"),
                E::NoBucketSelected => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "NO_BUCKET_SELECTED", "warning")
                }
                E::NothingToExport => (StatusCode::CONFLICT, "NOTHING_TO_EXPORT", "warning"),
                E::NoConversations => (StatusCode::NOT_FOUND, "NO_CONVERSATIONS", "warning"),
                E::UnknownConversation(_) => {
                    (StatusCode::NOT_FOUND, "UNKNOWN_CONVERSATION", "error")
                }
                E::Spreadsheet(_) | E::Config(_) | E::Io(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "error")
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, severity) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
                "severity": severity,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
