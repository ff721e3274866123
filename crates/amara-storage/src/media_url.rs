//! Read-side media URL resolution.
//!
//! Display components hand this service whatever URL string is persisted on
//! a content record and get back something renderable: external URLs pass
//! through, public-bucket objects resolve to their public URL without a
//! network call, and everything else gets a fresh signed read URL. Signed
//! URLs are never cached; consumers re-request on every render cycle.

use std::time::Duration;

use tracing::warn;

use crate::client::StorageClient;
use crate::object_url::{Bucket, ObjectUrl};

/// Default expiry for signed read URLs (1 hour).
pub const DEFAULT_READ_EXPIRY_SECS: u64 = 3600;

/// Short expiry used by high-churn consumers such as list thumbnails (10 minutes).
pub const SHORT_READ_EXPIRY_SECS: u64 = 600;

/// Maximum allowed expiry (7 days) to prevent long-lived URL leakage.
pub const MAX_READ_EXPIRY_SECS: u64 = 604800;

/// Resolves stored media URLs into renderable ones.
#[derive(Clone)]
pub struct MediaUrlService {
    client: StorageClient,
}

impl MediaUrlService {
    pub fn new(client: StorageClient) -> Self {
        Self { client }
    }

    /// Resolve a stored media URL for display.
    ///
    /// Returns `None` only when a signed URL was needed and the backend
    /// refused or failed; callers render a placeholder in that case rather
    /// than erroring.
    pub async fn media_url(
        &self,
        url: &str,
        expires_in: Duration,
        force_signed: bool,
    ) -> Option<String> {
        let parsed = match ObjectUrl::parse(url) {
            Some(parsed) => parsed,
            // External URL (e.g. a YouTube thumbnail): already usable.
            None => return Some(url.to_string()),
        };

        if parsed.managed_bucket() == Some(Bucket::Public) && !force_signed {
            return Some(self.client.public_url(&parsed.bucket, &parsed.path));
        }

        match self
            .client
            .create_signed_url(&parsed.bucket, &parsed.path, clamp_expiry(expires_in))
            .await
        {
            Ok(signed) => Some(signed),
            Err(e) => {
                warn!(bucket = %parsed.bucket, path = %parsed.path, error = %e, "Failed to sign media URL");
                None
            }
        }
    }

    /// Resolve with the default read expiry.
    pub async fn media_url_default(&self, url: &str) -> Option<String> {
        self.media_url(url, Duration::from_secs(DEFAULT_READ_EXPIRY_SECS), false)
            .await
    }
}

/// Clamp a caller-supplied expiry to the allowed maximum.
pub fn clamp_expiry(expires_in: Duration) -> Duration {
    Duration::from_secs(expires_in.as_secs().min(MAX_READ_EXPIRY_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StorageConfig;

    fn unroutable_service() -> MediaUrlService {
        // Any attempt to hit the network with this client is a test bug.
        MediaUrlService::new(StorageClient::new(StorageConfig {
            base_url: "http://storage.invalid".to_string(),
            service_key: "test-key".to_string(),
        }))
    }

    #[tokio::test]
    async fn test_external_url_passes_through() {
        let service = unroutable_service();
        let url = "https://img.youtube.com/vi/abc/maxresdefault.jpg";
        assert_eq!(
            service
                .media_url(url, Duration::from_secs(600), false)
                .await
                .as_deref(),
            Some(url)
        );
    }

    #[tokio::test]
    async fn test_public_bucket_is_pure_construction() {
        // Resolves without any network round-trip: the client points at an
        // unroutable host, so reaching the network would fail the test.
        let service = unroutable_service();
        let stored = "http://storage.invalid/storage/v1/object/public/public/images/recipe/a.jpg";
        let resolved = service
            .media_url(stored, Duration::from_secs(600), false)
            .await
            .expect("public objects always resolve");
        assert_eq!(resolved, stored);
    }

    #[tokio::test]
    async fn test_private_bucket_failure_is_none() {
        let service = unroutable_service();
        let stored = "http://storage.invalid/storage/v1/object/public/private/drafts/images/a.jpg";
        let resolved = service.media_url(stored, Duration::from_secs(600), false).await;
        assert!(resolved.is_none());
    }

    #[test]
    fn test_clamp_expiry() {
        assert_eq!(
            clamp_expiry(Duration::from_secs(60)),
            Duration::from_secs(60)
        );
        assert_eq!(
            clamp_expiry(Duration::from_secs(MAX_READ_EXPIRY_SECS * 2)),
            Duration::from_secs(MAX_READ_EXPIRY_SECS)
        );
    }
}
