//! Media URL parsing and construction.
//!
//! Every object the upload service produces is addressed by its canonical
//! public-style URL, `<base>/storage/v1/object/public/<bucket>/<path>`, even
//! for private-bucket objects. Read access is enforced at signing time, not
//! by URL shape. Strings that do not match this convention are external
//! URLs (e.g. a YouTube thumbnail) and are passed through untouched.

use std::fmt;

/// Marker that precedes `<bucket>/<path>` in a canonical object URL.
pub const PUBLIC_OBJECT_MARKER: &str = "/storage/v1/object/public/";

/// A managed storage bucket with its own access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// World-readable; objects are served directly from the public URL.
    Public,
    /// Requires a signed URL for every read.
    Private,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Public => "public",
            Bucket::Private => "private",
        }
    }

    /// Look up a managed bucket by name. Legacy (pre-split) bucket names
    /// return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "public" => Some(Bucket::Public),
            "private" => Some(Bucket::Private),
            _ => None,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Bucket::Public)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A `{bucket, path}` pair recovered from a stored media URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUrl {
    /// Bucket name as it appears in the URL. Kept as a string because
    /// legacy URLs reference buckets that predate the public/private split.
    pub bucket: String,
    /// Slash-delimited key within the bucket.
    pub path: String,
}

impl ObjectUrl {
    /// Parse a stored media URL into its bucket and path.
    ///
    /// Returns `None` when the string does not match the object-store
    /// convention. That is not a failure: it means "treat as an opaque
    /// external URL".
    pub fn parse(url: &str) -> Option<Self> {
        let (_, rest) = url.split_once(PUBLIC_OBJECT_MARKER)?;
        let (bucket, path) = rest.split_once('/')?;
        if bucket.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self {
            bucket: bucket.to_string(),
            path: path.to_string(),
        })
    }

    /// The managed bucket this URL points at, if any.
    pub fn managed_bucket(&self) -> Option<Bucket> {
        Bucket::from_name(&self.bucket)
    }

    /// Trailing filename segment of the path.
    pub fn filename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Build the canonical public-style URL for an object.
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}{}{}/{}",
        base_url.trim_end_matches('/'),
        PUBLIC_OBJECT_MARKER,
        bucket,
        path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_public_url() {
        let parsed =
            ObjectUrl::parse("https://x.example.co/storage/v1/object/public/public/images/recipe/abc.jpg")
                .expect("should parse");
        assert_eq!(parsed.bucket, "public");
        assert_eq!(parsed.path, "images/recipe/abc.jpg");
        assert_eq!(parsed.managed_bucket(), Some(Bucket::Public));
    }

    #[test]
    fn test_parse_private_bucket_inside_public_path() {
        // The "public" in the marker is the URL convention, not the bucket.
        let parsed =
            ObjectUrl::parse("https://x.supabase.co/storage/v1/object/public/private/images/recipe/abc.jpg")
                .expect("should parse");
        assert_eq!(parsed.bucket, "private");
        assert_eq!(parsed.path, "images/recipe/abc.jpg");
        assert_eq!(parsed.managed_bucket(), Some(Bucket::Private));
    }

    #[test]
    fn test_parse_legacy_bucket() {
        let parsed = ObjectUrl::parse("https://x.example.co/storage/v1/object/public/media/old/photo.png")
            .expect("should parse");
        assert_eq!(parsed.bucket, "media");
        assert_eq!(parsed.managed_bucket(), None);
        assert_eq!(parsed.filename(), "photo.png");
    }

    #[test]
    fn test_parse_external_url_is_none() {
        assert!(ObjectUrl::parse("https://img.youtube.com/vi/abc/maxresdefault.jpg").is_none());
        assert!(ObjectUrl::parse("not a url at all").is_none());
        assert!(ObjectUrl::parse("").is_none());
    }

    #[test]
    fn test_parse_rejects_bucket_without_path() {
        assert!(ObjectUrl::parse("https://x.example.co/storage/v1/object/public/public").is_none());
    }

    #[test]
    fn test_parse_is_left_inverse_of_public_object_url() {
        let url = public_object_url("https://x.example.co", "private", "drafts/images/1700000000-abc.jpg");
        let parsed = ObjectUrl::parse(&url).expect("should parse");
        assert_eq!(parsed.bucket, "private");
        assert_eq!(parsed.path, "drafts/images/1700000000-abc.jpg");
    }

    #[test]
    fn test_public_object_url_trims_trailing_slash() {
        assert_eq!(
            public_object_url("https://x.example.co/", "public", "images/recipe/a.jpg"),
            "https://x.example.co/storage/v1/object/public/public/images/recipe/a.jpg"
        );
    }
}
