//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to configure storage client: {0}")]
    ConfigError(String),

    #[error("Signing failed: {0}")]
    SignFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn sign_failed(msg: impl Into<String>) -> Self {
        Self::SignFailed(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }
}
