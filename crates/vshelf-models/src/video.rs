//! Video asset models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::reference::StorageReference;

/// Unique identifier for a video asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub Uuid);

#[derive(Debug, Error)]
#[error("Invalid video ID: {0}")]
pub struct VideoIdError(String);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VideoId {
    type Err = VideoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| VideoIdError(s.to_string()))
    }
}

impl From<Uuid> for VideoId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// A user's video record.
///
/// The record itself is owned by the persistence layer; the upload pipeline
/// only writes `video_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAsset {
    /// Unique video ID
    pub id: VideoId,

    /// Owner
    pub user_id: Uuid,

    pub title: String,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Encoded [`StorageReference`] while persisted; a presigned URL once
    /// signed for a caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl VideoAsset {
    /// Create a new asset with no media attached.
    pub fn new(user_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: VideoId::new(),
            user_id,
            title: title.into(),
            description: String::new(),
            created_at: now,
            updated_at: now,
            thumbnail_url: None,
            video_url: None,
        }
    }

    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        &self.user_id == user_id
    }

    /// Attach an uploaded video, storing the encoded reference.
    pub fn attach_video(&mut self, reference: &StorageReference) {
        self.video_url = Some(reference.encode());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_generation() {
        let id1 = VideoId::new();
        let id2 = VideoId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_video_id_parse() {
        let id = VideoId::new();
        let parsed: VideoId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<VideoId>().is_err());
    }

    #[test]
    fn test_attach_video() {
        let owner = Uuid::new_v4();
        let mut asset = VideoAsset::new(owner, "Test Video");
        assert!(asset.video_url.is_none());
        assert!(asset.is_owned_by(&owner));

        asset.attach_video(&StorageReference::new("bucket", "landscape/abc"));
        assert_eq!(asset.video_url.as_deref(), Some("bucket,landscape/abc"));
        assert!(asset.updated_at >= asset.created_at);
    }

    #[test]
    fn test_serialization_skips_missing_urls() {
        let asset = VideoAsset::new(Uuid::new_v4(), "Untitled");
        let json = serde_json::to_value(&asset).unwrap();
        assert!(json.get("video_url").is_none());
        assert!(json.get("thumbnail_url").is_none());
        assert_eq!(json["title"], "Untitled");
    }
}
