//! Shared data models for the VShelf video backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video assets and their identifiers
//! - Aspect classification of probed videos
//! - Persisted storage references (bucket + key)
//! - Accepted upload media types

pub mod aspect;
pub mod media_type;
pub mod reference;
pub mod video;

// Re-export common types
pub use aspect::{classify_dimensions, AspectClass};
pub use media_type::{essence_of, MediaTypeError, SUPPORTED_VIDEO_TYPE};
pub use reference::{ReferenceError, StorageReference, REFERENCE_DELIMITER};
pub use video::{VideoAsset, VideoId, VideoIdError};
