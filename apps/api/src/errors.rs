#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Typed failure taxonomy for the request pipeline.
///
/// Every kind is caught at the orchestration boundary and converted into the
/// fallback edge — none of these may escape to the HTTP handler as a crash.
/// Credential values must never appear in any of these messages.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineError {
    #[error("authentication failed: the API credential was rejected")]
    Auth,

    #[error("transport failure (status {status:?}): {message}")]
    Transport {
        /// HTTP status of the last failed attempt; `None` for network-level errors.
        status: Option<u16>,
        message: String,
    },

    #[error("model response contained no text content")]
    EmptyResponse,

    #[error("response text is not valid structured data: {snippet}")]
    Format {
        /// Bounded excerpt of the offending substring, for diagnostics.
        snippet: String,
    },

    #[error("search returned no matching listings")]
    NoResults,
}

impl PipelineError {
    /// Only transport-level failures are worth another attempt.
    /// Auth rejections are terminal: retrying a bad credential cannot succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::Transport { .. })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Auth => ErrorKind::AuthError,
            PipelineError::Transport { .. } => ErrorKind::TransportError,
            PipelineError::EmptyResponse => ErrorKind::EmptyResponseError,
            PipelineError::Format { .. } => ErrorKind::FormatError,
            PipelineError::NoResults => ErrorKind::NoResultsError,
        }
    }
}

/// Machine-readable error tag surfaced in `SearchOutcome` so the rendering
/// collaborator can branch on the failure class without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    AuthError,
    TransportError,
    EmptyResponseError,
    FormatError,
    NoResultsError,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
