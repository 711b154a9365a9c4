use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt::Display;

use crate::ingest::IngestError;

/// API error surfaced to clients as `{"error": <code>, "message": <detail>}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    /// Storage-layer failures propagate verbatim, no retry and no redaction.
    pub fn storage(error: impl Into<String>, err: impl Display) -> Self {
        let error = error.into();
        tracing::error!(error = %err, code = %error, "storage error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.error,
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        Self::bad_request(err.code(), err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
