//! Storage API client.
//!
//! Talks to the object store's REST API (`/storage/v1`) with the
//! service-role key. This key never leaves the backend; browser clients
//! only ever see the short-lived signed URLs minted here.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::object_url::public_object_url;

/// Configuration for the storage client.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL of the object store (without the `/storage/v1` suffix)
    pub base_url: String,
    /// Service-role API key
    pub service_key: String,
}

impl StorageConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            base_url: std::env::var("STORAGE_API_URL")
                .map_err(|_| StorageError::config_error("STORAGE_API_URL not set"))?,
            service_key: std::env::var("STORAGE_SERVICE_KEY")
                .map_err(|_| StorageError::config_error("STORAGE_SERVICE_KEY not set"))?,
        })
    }
}

/// A signed write URL plus the object key it authorizes.
#[derive(Debug, Clone)]
pub struct SignedUpload {
    /// Fully-qualified URL to PUT the file bytes to.
    pub url: String,
    /// Object key within the bucket.
    pub path: String,
}

#[derive(Deserialize)]
struct SignReadResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

#[derive(Deserialize)]
struct SignUploadResponse {
    url: String,
}

/// Object storage client.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl StorageClient {
    /// Create a new client from configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service_key: config.service_key,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self::new(StorageConfig::from_env()?))
    }

    /// Base URL of the object store.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Canonical public-style URL for an object.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.base_url, bucket, path)
    }

    /// Mint a time-limited signed read URL for a private-bucket object.
    pub async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        validate_key(path)?;
        debug!(bucket, path, expires_in_secs = expires_in.as_secs(), "Signing read URL");

        let endpoint = format!("{}/storage/v1/object/sign/{}/{}", self.base_url, bucket, path);
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&json!({ "expiresIn": expires_in.as_secs() }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::sign_failed(format!("{}: {}", status, body)));
        }

        let signed: SignReadResponse = response.json().await?;
        Ok(format!("{}/storage/v1{}", self.base_url, signed.signed_url))
    }

    /// Mint a signed write URL authorizing one upload to `bucket/path`.
    pub async fn create_signed_upload_url(
        &self,
        bucket: &str,
        path: &str,
    ) -> StorageResult<SignedUpload> {
        validate_key(path)?;
        debug!(bucket, path, "Signing upload URL");

        let endpoint = format!(
            "{}/storage/v1/object/upload/sign/{}/{}",
            self.base_url, bucket, path
        );
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::sign_failed(format!("{}: {}", status, body)));
        }

        let signed: SignUploadResponse = response.json().await?;
        Ok(SignedUpload {
            url: format!("{}/storage/v1{}", self.base_url, signed.url),
            path: path.to_string(),
        })
    }

    /// PUT file bytes to a previously minted signed write URL.
    pub async fn upload_to_signed_url(
        &self,
        signed_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> StorageResult<()> {
        let size = bytes.len();
        debug!(signed_url, size, "Uploading bytes");

        let response = self
            .http
            .put(signed_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::upload_failed(format!("{}: {}", status, body)));
        }

        info!(size, "Upload complete");
        Ok(())
    }

    /// Check connectivity to the object store by listing buckets.
    pub async fn check_connectivity(&self) -> StorageResult<()> {
        let endpoint = format!("{}/storage/v1/bucket", self.base_url);
        let response = self
            .http
            .get(&endpoint)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::config_error(format!(
                "storage connectivity check failed: {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Reject object keys that could escape their folder or smuggle separators.
fn validate_key(path: &str) -> StorageResult<()> {
    if path.is_empty() {
        return Err(StorageError::invalid_key("empty key"));
    }
    if path.starts_with('/') || path.contains('\\') || path.split('/').any(|seg| seg == "..") {
        return Err(StorageError::invalid_key(path));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("images/recipe/abc.jpg").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("images/../secrets.txt").is_err());
        assert!(validate_key("images\\recipe\\abc.jpg").is_err());
    }

    #[test]
    fn test_public_url() {
        let client = StorageClient::new(StorageConfig {
            base_url: "https://x.example.co/".to_string(),
            service_key: "key".to_string(),
        });
        assert_eq!(
            client.public_url("public", "images/recipe/a.jpg"),
            "https://x.example.co/storage/v1/object/public/public/images/recipe/a.jpg"
        );
    }
}
