//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use amara_storage::StorageError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            // Malformed keys are the caller's fault; everything else from
            // the storage layer is a backend problem.
            ApiError::Storage(StorageError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) | ApiError::Storage(_)
                if status == StatusCode::INTERNAL_SERVER_ERROR =>
            {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse { detail, code: None };

        (status, Json(body)).into_response()
    }
}
