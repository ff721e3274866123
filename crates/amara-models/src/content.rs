//! Content classification models.
//!
//! These enums drive storage routing: publication status picks a bucket,
//! content type picks a folder, media type picks the folder family.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication lifecycle stage of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    /// Not yet published, only visible in the admin dashboard
    Draft,
    /// Live on the public site
    Published,
    /// Previously published, withdrawn from the public site
    Archived,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }

    /// Whether the content is live on the public site.
    ///
    /// Archived content is not public even though it once was: status
    /// changes never move stored objects between buckets automatically.
    pub fn is_published(&self) -> bool {
        matches!(self, ContentStatus::Published)
    }

    /// The fallback used when the publication state of legacy content is
    /// unknown. This is the only place a default status lives; every API
    /// takes an explicit status.
    pub fn conservative() -> Self {
        ContentStatus::Draft
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of content record a media object belongs to.
///
/// Only used to pick a folder name, never a bucket. Unrecognized values
/// deserialize as `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Recipe,
    Vlog,
    Healing,
    Product,
    Homepage,
    #[default]
    #[serde(other)]
    General,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Recipe => "recipe",
            ContentType::Vlog => "vlog",
            ContentType::Healing => "healing",
            ContentType::Product => "product",
            ContentType::Homepage => "homepage",
            ContentType::General => "general",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of media file being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
    Thumbnail,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Thumbnail => "thumbnail",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ContentStatus::Published).unwrap(),
            "\"published\""
        );
        let status: ContentStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, ContentStatus::Archived);
    }

    #[test]
    fn test_archived_is_not_published() {
        assert!(!ContentStatus::Archived.is_published());
        assert!(!ContentStatus::Draft.is_published());
        assert!(ContentStatus::Published.is_published());
    }

    #[test]
    fn test_conservative_status_is_draft() {
        assert_eq!(ContentStatus::conservative(), ContentStatus::Draft);
    }

    #[test]
    fn test_unknown_content_type_falls_through_to_general() {
        let ct: ContentType = serde_json::from_str("\"newsletter\"").unwrap();
        assert_eq!(ct, ContentType::General);
    }

    #[test]
    fn test_content_type_roundtrip() {
        let ct: ContentType = serde_json::from_str("\"recipe\"").unwrap();
        assert_eq!(ct, ContentType::Recipe);
        assert_eq!(serde_json::to_string(&ct).unwrap(), "\"recipe\"");
    }
}
