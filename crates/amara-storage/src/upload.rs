//! Upload orchestration.
//!
//! Flow: validate the file, resolve its destination, mint a signed write
//! URL, PUT the bytes, and hand back the canonical public-style URL for the
//! object. Failures come back as an [`UploadOutcome`] value; nothing in this
//! module propagates an error past the service boundary, so form callers can
//! show the message and leave their state untouched for a retry.

use amara_models::{format_bytes, ContentStatus, ContentType, MediaType};
use futures_util::future::join_all;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::client::StorageClient;
use crate::object_url::Bucket;
use crate::path::StoragePath;

/// Maximum accepted video size (25 MB).
pub const MAX_VIDEO_BYTES: u64 = 25 * 1024 * 1024;

/// Video container extensions accepted even when the browser reports no
/// usable MIME type.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v", "mpg", "mpeg"];

/// A file handed to the upload service.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original filename; only its extension survives.
    pub filename: String,
    /// MIME type as reported by the client (may be empty).
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercased extension of the original filename, if any.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Result of a single upload. `success` is false exactly when `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadOutcome {
    pub fn ok(url: String) -> Self {
        Self {
            success: true,
            url: Some(url),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregate result of a batch upload.
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    /// Per-file outcomes, in input order.
    pub outcomes: Vec<UploadOutcome>,
    /// Summary of every failure, or `None` when all files uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    fn new(filenames: &[&str], outcomes: Vec<UploadOutcome>) -> Self {
        let failures: Vec<String> = outcomes
            .iter()
            .zip(filenames)
            .filter_map(|(outcome, name)| {
                outcome
                    .error
                    .as_ref()
                    .map(|reason| format!("{}: {}", name, reason))
            })
            .collect();

        let error = if failures.is_empty() {
            None
        } else {
            Some(failures.join("; "))
        };

        Self { outcomes, error }
    }

    /// URLs of the files that uploaded, in input order.
    pub fn urls(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| o.url.as_deref())
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Reject files that are not images.
pub fn validate_image(file: &UploadFile) -> Result<(), String> {
    if file.content_type.starts_with("image/") {
        Ok(())
    } else {
        Err(format!(
            "\"{}\" is not an image (got type \"{}\")",
            file.filename, file.content_type
        ))
    }
}

/// Reject videos that are oversized or in an unrecognized container.
///
/// Browsers sometimes fail to report a MIME type for valid containers, so a
/// known extension is accepted as a fallback.
pub fn validate_video(file: &UploadFile) -> Result<(), String> {
    if file.size() > MAX_VIDEO_BYTES {
        return Err(format!(
            "Video file is {}. Maximum size is 25MB",
            format_bytes(file.size())
        ));
    }

    let mime_ok = file.content_type.starts_with("video/");
    let ext_ok = file
        .extension()
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);

    if mime_ok || ext_ok {
        Ok(())
    } else {
        Err(format!(
            "\"{}\" is not a recognized video format (accepted: {})",
            file.filename,
            VIDEO_EXTENSIONS.join(", ")
        ))
    }
}

/// Upload service.
#[derive(Clone)]
pub struct Uploader {
    client: StorageClient,
}

impl Uploader {
    pub fn new(client: StorageClient) -> Self {
        Self { client }
    }

    /// Upload a file to an explicit destination.
    ///
    /// The filename is rewritten to `<millis>-<base36>.<ext>` so concurrent
    /// uploads of identically named files never collide. The returned URL is
    /// the canonical public-style locator even for private-bucket objects;
    /// read access is enforced at signing time.
    pub async fn upload_file(&self, file: &UploadFile, folder: &str, bucket: Bucket) -> UploadOutcome {
        let object_name = object_name(&file.filename);
        let key = format!("{}/{}", folder.trim_matches('/'), object_name);
        debug!(key = %key, bucket = %bucket, size = file.size(), "Starting upload");

        let signed = match self
            .client
            .create_signed_upload_url(bucket.as_str(), &key)
            .await
        {
            Ok(signed) => signed,
            Err(e) => return UploadOutcome::failed(e.to_string()),
        };

        if let Err(e) = self
            .client
            .upload_to_signed_url(&signed.url, &file.content_type, file.bytes.clone())
            .await
        {
            return UploadOutcome::failed(e.to_string());
        }

        let url = self.client.public_url(bucket.as_str(), &key);
        info!(key = %key, bucket = %bucket, "Uploaded");
        UploadOutcome::ok(url)
    }

    /// Upload an image for a content record.
    pub async fn upload_image(
        &self,
        file: &UploadFile,
        content_type: ContentType,
        status: ContentStatus,
    ) -> UploadOutcome {
        if let Err(msg) = validate_image(file) {
            return UploadOutcome::failed(msg);
        }
        let dest = StoragePath::resolve(content_type, MediaType::Image, status, None);
        self.upload_file(file, &dest.folder, dest.bucket).await
    }

    /// Upload a video for a content record.
    pub async fn upload_video(
        &self,
        file: &UploadFile,
        content_type: ContentType,
        status: ContentStatus,
    ) -> UploadOutcome {
        if let Err(msg) = validate_video(file) {
            return UploadOutcome::failed(msg);
        }
        let dest = StoragePath::resolve(content_type, MediaType::Video, status, None);
        self.upload_file(file, &dest.folder, dest.bucket).await
    }

    /// Upload a thumbnail for a content record.
    pub async fn upload_thumbnail(
        &self,
        file: &UploadFile,
        content_type: ContentType,
        status: ContentStatus,
    ) -> UploadOutcome {
        if let Err(msg) = validate_image(file) {
            return UploadOutcome::failed(msg);
        }
        let dest = StoragePath::resolve(content_type, MediaType::Thumbnail, status, None);
        self.upload_file(file, &dest.folder, dest.bucket).await
    }

    /// Upload a photo into an album's folder.
    pub async fn upload_album_photo(
        &self,
        file: &UploadFile,
        album_id: &str,
        status: ContentStatus,
    ) -> UploadOutcome {
        if let Err(msg) = validate_image(file) {
            return UploadOutcome::failed(msg);
        }
        let custom = format!("albums/{}", album_id);
        let dest = StoragePath::resolve(ContentType::General, MediaType::Image, status, Some(&custom));
        self.upload_file(file, &dest.folder, dest.bucket).await
    }

    /// Upload several images concurrently.
    ///
    /// All uploads are started together and awaited together; a failure in
    /// one never cancels the others, and there is no ordering guarantee
    /// between the individual PUTs. There are no retries: each failure
    /// surfaces in its file's outcome and in the aggregate error.
    pub async fn upload_batch(
        &self,
        files: &[UploadFile],
        content_type: ContentType,
        status: ContentStatus,
    ) -> BatchOutcome {
        let outcomes = join_all(
            files
                .iter()
                .map(|file| self.upload_image(file, content_type, status)),
        )
        .await;

        let filenames: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        BatchOutcome::new(&filenames, outcomes)
    }
}

/// Collision-free object name: `<millis>-<base36 suffix>.<ext>`.
fn object_name(filename: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = base36_suffix(8);
    match filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
    {
        Some(ext) => format!("{}-{}.{}", millis, suffix, ext),
        None => format!("{}-{}", millis, suffix),
    }
}

fn base36_suffix(len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
