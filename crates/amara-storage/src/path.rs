//! Upload destination routing.
//!
//! Publication status is the single rule that picks a bucket: published
//! content is world-readable, everything else stays private. Content type
//! and media type only pick the folder. Status changes never move objects
//! between buckets; callers decide when (and whether) to migrate.

use amara_models::{ContentStatus, ContentType, MediaType};

use crate::object_url::Bucket;

/// A computed upload destination. Transient: only the resulting object URL
/// is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    pub bucket: Bucket,
    pub folder: String,
}

impl StoragePath {
    /// Compute the destination for a new upload.
    ///
    /// `custom_path` overrides all folder computation; the bucket rule
    /// still applies. Homepage media is always public-facing by product
    /// definition, so its status is forced to published before routing.
    pub fn resolve(
        content_type: ContentType,
        media_type: MediaType,
        status: ContentStatus,
        custom_path: Option<&str>,
    ) -> Self {
        let status = if content_type == ContentType::Homepage {
            ContentStatus::Published
        } else {
            status
        };

        let bucket = if status.is_published() {
            Bucket::Public
        } else {
            Bucket::Private
        };

        if let Some(custom) = custom_path {
            return Self {
                bucket,
                folder: custom.trim_matches('/').to_string(),
            };
        }

        let folder = match media_type {
            // Thumbnails always nest under images/<content-type>
            MediaType::Thumbnail => format!("images/{}", content_type),
            MediaType::Video => {
                if status.is_published() {
                    format!("videos/{}", content_type)
                } else {
                    "drafts/videos".to_string()
                }
            }
            MediaType::Image => {
                if status.is_published() {
                    // General uploads land in a flat uploads/ folder rather
                    // than images/general
                    if content_type == ContentType::General {
                        "uploads".to_string()
                    } else {
                        format!("images/{}", content_type)
                    }
                } else {
                    "drafts/images".to_string()
                }
            }
        };

        Self { bucket, folder }
    }

    /// Full object key for a filename under this destination.
    pub fn join(&self, filename: &str) -> String {
        format!("{}/{}", self.folder, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_follows_status() {
        for (status, expected) in [
            (ContentStatus::Published, Bucket::Public),
            (ContentStatus::Draft, Bucket::Private),
            (ContentStatus::Archived, Bucket::Private),
        ] {
            let dest = StoragePath::resolve(ContentType::Recipe, MediaType::Image, status, None);
            assert_eq!(dest.bucket, expected, "status {}", status);
        }
    }

    #[test]
    fn test_homepage_is_always_public() {
        for status in [
            ContentStatus::Draft,
            ContentStatus::Published,
            ContentStatus::Archived,
        ] {
            let dest = StoragePath::resolve(ContentType::Homepage, MediaType::Image, status, None);
            assert_eq!(dest.bucket, Bucket::Public, "status {}", status);
            assert_eq!(dest.folder, "images/homepage");
        }
    }

    #[test]
    fn test_recipe_image_draft_and_published() {
        let draft = StoragePath::resolve(
            ContentType::Recipe,
            MediaType::Image,
            ContentStatus::Draft,
            None,
        );
        assert_eq!(draft.bucket, Bucket::Private);
        assert_eq!(draft.folder, "drafts/images");

        let published = StoragePath::resolve(
            ContentType::Recipe,
            MediaType::Image,
            ContentStatus::Published,
            None,
        );
        assert_eq!(published.bucket, Bucket::Public);
        assert_eq!(published.folder, "images/recipe");
    }

    #[test]
    fn test_video_folders() {
        let published = StoragePath::resolve(
            ContentType::Vlog,
            MediaType::Video,
            ContentStatus::Published,
            None,
        );
        assert_eq!(published.folder, "videos/vlog");

        let draft = StoragePath::resolve(
            ContentType::Vlog,
            MediaType::Video,
            ContentStatus::Draft,
            None,
        );
        assert_eq!(draft.folder, "drafts/videos");
        assert_eq!(draft.bucket, Bucket::Private);
    }

    #[test]
    fn test_thumbnail_always_under_images() {
        let draft = StoragePath::resolve(
            ContentType::Product,
            MediaType::Thumbnail,
            ContentStatus::Draft,
            None,
        );
        assert_eq!(draft.folder, "images/product");
        assert_eq!(draft.bucket, Bucket::Private);
    }

    #[test]
    fn test_general_published_images_use_uploads() {
        let dest = StoragePath::resolve(
            ContentType::General,
            MediaType::Image,
            ContentStatus::Published,
            None,
        );
        assert_eq!(dest.folder, "uploads");
    }

    #[test]
    fn test_custom_path_overrides_folder_but_not_bucket() {
        let dest = StoragePath::resolve(
            ContentType::General,
            MediaType::Image,
            ContentStatus::Draft,
            Some("/albums/summer-2026/"),
        );
        assert_eq!(dest.bucket, Bucket::Private);
        assert_eq!(dest.folder, "albums/summer-2026");
        assert_eq!(dest.join("a.jpg"), "albums/summer-2026/a.jpg");
    }
}
