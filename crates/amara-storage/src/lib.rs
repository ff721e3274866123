//! Object storage layer for the Amara backend.
//!
//! This crate provides:
//! - Media URL parsing and canonical public-URL construction
//! - Bucket/folder routing by content type and publication status
//! - Signed read/write URL generation via the storage API
//! - File upload orchestration with validation
//! - Legacy URL migration into the bucket-split layout

pub mod client;
pub mod error;
pub mod media_url;
pub mod migrate;
pub mod object_url;
pub mod path;
pub mod upload;

pub use client::{SignedUpload, StorageClient, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use media_url::{
    clamp_expiry, MediaUrlService, DEFAULT_READ_EXPIRY_SECS, MAX_READ_EXPIRY_SECS,
    SHORT_READ_EXPIRY_SECS,
};
pub use migrate::{migrate_url, migrate_url_unknown_status};
pub use object_url::{public_object_url, Bucket, ObjectUrl, PUBLIC_OBJECT_MARKER};
pub use path::StoragePath;
pub use upload::{
    validate_image, validate_video, BatchOutcome, UploadFile, UploadOutcome, Uploader,
    MAX_VIDEO_BYTES, VIDEO_EXTENSIONS,
};
