//! Legacy URL migration.
//!
//! Before the public/private bucket split, all media lived in assorted
//! single-purpose buckets. These helpers rewrite such URLs into the current
//! layout. The rewrite is one-directional and lossy: only the trailing
//! filename survives, any legacy nested subpath is discarded. The object
//! itself is not moved; callers copy objects separately if they need to.

use amara_models::{ContentStatus, ContentType, MediaType};

use crate::object_url::{public_object_url, ObjectUrl, PUBLIC_OBJECT_MARKER};
use crate::path::StoragePath;

/// Rewrite a legacy media URL into the bucket-split layout.
///
/// Idempotent: URLs that are unparseable or already point at a managed
/// bucket come back unchanged.
pub fn migrate_url(
    old_url: &str,
    content_type: ContentType,
    media_type: MediaType,
    status: ContentStatus,
) -> String {
    let parsed = match ObjectUrl::parse(old_url) {
        Some(parsed) => parsed,
        // External URL: nothing to migrate.
        None => return old_url.to_string(),
    };

    if parsed.managed_bucket().is_some() {
        // Already migrated.
        return old_url.to_string();
    }

    let filename = parsed.filename().to_string();
    let dest = StoragePath::resolve(content_type, media_type, status, None);
    let base = old_url.split(PUBLIC_OBJECT_MARKER).next().unwrap_or_default();

    public_object_url(base, dest.bucket.as_str(), &dest.join(&filename))
}

/// Migrate a URL whose publication state is unknown, routing it as a draft.
pub fn migrate_url_unknown_status(
    old_url: &str,
    content_type: ContentType,
    media_type: MediaType,
) -> String {
    migrate_url(old_url, content_type, media_type, ContentStatus::conservative())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_url_unchanged() {
        let url = "https://img.youtube.com/vi/abc/maxresdefault.jpg";
        assert_eq!(
            migrate_url(url, ContentType::Vlog, MediaType::Thumbnail, ContentStatus::Published),
            url
        );
    }

    #[test]
    fn test_legacy_url_rewritten_keeping_only_filename() {
        let legacy = "https://x.example.co/storage/v1/object/public/recipe-photos/2021/summer/tart.jpg";
        let migrated = migrate_url(
            legacy,
            ContentType::Recipe,
            MediaType::Image,
            ContentStatus::Published,
        );
        assert_eq!(
            migrated,
            "https://x.example.co/storage/v1/object/public/public/images/recipe/tart.jpg"
        );
    }

    #[test]
    fn test_legacy_draft_routes_to_private() {
        let legacy = "https://x.example.co/storage/v1/object/public/recipe-photos/tart.jpg";
        let migrated = migrate_url(
            legacy,
            ContentType::Recipe,
            MediaType::Image,
            ContentStatus::Draft,
        );
        assert_eq!(
            migrated,
            "https://x.example.co/storage/v1/object/public/private/drafts/images/tart.jpg"
        );
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let legacy = "https://x.example.co/storage/v1/object/public/old-media/deep/nested/pic.png";
        let once = migrate_url(legacy, ContentType::Product, MediaType::Image, ContentStatus::Published);
        let twice = migrate_url(&once, ContentType::Product, MediaType::Image, ContentStatus::Published);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_status_routes_conservatively() {
        let legacy = "https://x.example.co/storage/v1/object/public/old-media/pic.png";
        let migrated = migrate_url_unknown_status(legacy, ContentType::General, MediaType::Image);
        assert!(migrated.contains("/private/drafts/images/pic.png"), "{}", migrated);
    }
}
