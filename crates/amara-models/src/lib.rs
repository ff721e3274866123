//! Shared data models for the Amara backend.
//!
//! This crate provides Serde-serializable types for:
//! - Content publication status
//! - Content and media kinds used for storage routing
//! - Byte-size formatting helpers

pub mod content;
pub mod utils;

// Re-export common types
pub use content::{ContentStatus, ContentType, MediaType};
pub use utils::format_bytes;
