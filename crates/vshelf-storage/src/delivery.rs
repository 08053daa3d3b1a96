//! Presigned retrieval URLs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use vshelf_models::StorageReference;

use crate::error::StorageResult;
use crate::store::ObjectStore;

/// Default expiry for video URLs (1 minute).
pub const DEFAULT_VIDEO_URL_EXPIRY_SECS: u64 = 60;

/// Maximum allowed expiry (7 days), the SigV4 presign limit.
pub const MAX_EXPIRY_SECS: u64 = 604800;

/// Delivery configuration.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Lifetime of signed video URLs.
    pub video_url_expiry: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            video_url_expiry: Duration::from_secs(DEFAULT_VIDEO_URL_EXPIRY_SECS),
        }
    }
}

impl DeliveryConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::with_expiry_secs(
            std::env::var("VIDEO_URL_EXPIRY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_VIDEO_URL_EXPIRY_SECS),
        )
    }

    /// Expiry is clamped to `1..=MAX_EXPIRY_SECS`.
    pub fn with_expiry_secs(secs: u64) -> Self {
        Self {
            video_url_expiry: Duration::from_secs(secs.clamp(1, MAX_EXPIRY_SECS)),
        }
    }
}

/// A signed URL and when it stops working.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in_secs: u64,
}

/// Produces time-limited retrieval URLs for stored videos.
#[derive(Clone)]
pub struct VideoUrlSigner {
    store: Arc<dyn ObjectStore>,
    config: DeliveryConfig,
}

impl VideoUrlSigner {
    pub fn new(store: Arc<dyn ObjectStore>, config: DeliveryConfig) -> Self {
        Self { store, config }
    }

    /// Presign a GET for the referenced object.
    pub async fn sign(&self, reference: &StorageReference) -> StorageResult<DeliveryUrl> {
        let expiry = self.config.video_url_expiry;
        let url = self
            .store
            .presign_get(&reference.bucket, &reference.key, expiry)
            .await?;

        debug!(
            "Signed {}/{} for {}s",
            reference.bucket,
            reference.key,
            expiry.as_secs()
        );

        Ok(DeliveryUrl {
            url,
            expires_at: Utc::now() + chrono::Duration::seconds(expiry.as_secs() as i64),
            expires_in_secs: expiry.as_secs(),
        })
    }
}
