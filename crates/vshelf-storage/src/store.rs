//! Object store capability.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StorageResult;

/// Remote object storage as seen by the upload pipeline.
///
/// Single-shot writes are atomic: after `put_file` fails no partial object
/// is visible under the key.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stream a local file to `bucket/key` with the given content type.
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Presigned GET URL valid for `expires_in`.
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Cheap reachability check against a bucket.
    async fn check_connectivity(&self, bucket: &str) -> StorageResult<()>;
}
