//! Storage signing handlers.
//!
//! These endpoints exist because minting a signed URL requires the
//! service-role key, which never reaches the browser. The admin dashboard
//! requests a signed write URL here, PUTs the file bytes itself, and
//! display components request signed read URLs for private-bucket objects.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use amara_models::{ContentStatus, ContentType, MediaType};
use amara_storage::{clamp_expiry, Bucket, StoragePath, DEFAULT_READ_EXPIRY_SECS};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

// ============================================================================
// Signed upload
// ============================================================================

/// Request body for a signed write URL.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUploadRequest {
    /// Object key within the bucket.
    pub path: String,
    /// MIME type the client will send in its PUT.
    pub content_type: String,
    /// Destination bucket name.
    pub bucket: String,
}

/// Response with the signed write URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUploadResponse {
    pub signed_url: String,
    pub path: String,
}

/// Mint a signed write URL for one upload.
///
/// POST /api/storage/signed-upload
pub async fn create_signed_upload(
    State(state): State<AppState>,
    Json(body): Json<SignedUploadRequest>,
) -> ApiResult<Json<SignedUploadResponse>> {
    // Writes are only ever routed into the managed buckets.
    let bucket = Bucket::from_name(&body.bucket)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown bucket \"{}\"", body.bucket)))?;

    let start = std::time::Instant::now();
    let signed = state
        .storage
        .create_signed_upload_url(bucket.as_str(), &body.path)
        .await?;
    metrics::record_signing_duration(start.elapsed().as_secs_f64());
    metrics::record_signed_upload_url(bucket.as_str());

    info!(bucket = %bucket, path = %signed.path, content_type = %body.content_type, "Issued signed upload URL");

    Ok(Json(SignedUploadResponse {
        signed_url: signed.url,
        path: signed.path,
    }))
}

// ============================================================================
// Signed read
// ============================================================================

/// Request body for a signed read URL.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedReadRequest {
    /// Bucket name. Legacy bucket names are allowed: pre-migration content
    /// is still readable through signing.
    pub bucket: String,
    /// Object key within the bucket.
    pub path: String,
    /// Expiry in seconds; clamped server-side.
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    DEFAULT_READ_EXPIRY_SECS
}

/// Response with the signed read URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedReadResponse {
    pub signed_url: String,
}

/// Mint a time-limited signed read URL.
///
/// POST /api/storage/get-signed-url
pub async fn get_signed_url(
    State(state): State<AppState>,
    Json(body): Json<SignedReadRequest>,
) -> ApiResult<Json<SignedReadResponse>> {
    if body.bucket.is_empty() || body.bucket.contains('/') {
        return Err(ApiError::bad_request(format!(
            "Invalid bucket \"{}\"",
            body.bucket
        )));
    }

    let expires_in = clamp_expiry(Duration::from_secs(body.expires_in));

    let start = std::time::Instant::now();
    let signed_url = state
        .storage
        .create_signed_url(&body.bucket, &body.path, expires_in)
        .await?;
    metrics::record_signing_duration(start.elapsed().as_secs_f64());
    metrics::record_signed_read_url(&body.bucket);

    Ok(Json(SignedReadResponse { signed_url }))
}

// ============================================================================
// Destination resolution
// ============================================================================

/// Request body for upload destination resolution.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvePathRequest {
    pub content_type: ContentType,
    pub media_type: MediaType,
    /// Publication status; required, there is no implicit default.
    pub status: ContentStatus,
    #[serde(default)]
    pub custom_path: Option<String>,
}

/// Response with the computed destination.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvePathResponse {
    pub bucket: String,
    pub folder: String,
}

/// Compute the destination bucket/folder for an upload.
///
/// POST /api/storage/resolve-path
pub async fn resolve_path(
    Json(body): Json<ResolvePathRequest>,
) -> ApiResult<Json<ResolvePathResponse>> {
    let dest = StoragePath::resolve(
        body.content_type,
        body.media_type,
        body.status,
        body.custom_path.as_deref(),
    );

    Ok(Json(ResolvePathResponse {
        bucket: dest.bucket.as_str().to_string(),
        folder: dest.folder,
    }))
}
