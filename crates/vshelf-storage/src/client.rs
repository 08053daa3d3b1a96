//! S3 client implementation.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::store::ObjectStore;

/// Configuration for the S3 client.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket uploads are written to
    pub bucket_name: String,
    /// Region
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...)
    pub endpoint_url: Option<String>,
    /// Static credentials; the default AWS chain is used when unset
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Path-style addressing (required by most self-hosted endpoints)
    pub force_path_style: bool,
}

impl S3Config {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            bucket_name: std::env::var("S3_BUCKET")
                .map_err(|_| StorageError::config_error("S3_BUCKET not set"))?,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint_url: std::env::var("S3_ENDPOINT_URL").ok(),
            access_key_id: std::env::var("S3_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("S3_SECRET_ACCESS_KEY").ok(),
            force_path_style: std::env::var("S3_FORCE_PATH_STYLE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}

/// S3 storage client.
///
/// Cheap to clone; the underlying SDK client is reference counted.
#[derive(Clone)]
pub struct S3Client {
    client: Client,
}

impl S3Client {
    /// Create a new S3 client from configuration.
    pub async fn new(config: &S3Config) -> StorageResult<Self> {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

        match (&config.access_key_id, &config.secret_access_key) {
            (Some(id), Some(secret)) => {
                loader = loader.credentials_provider(Credentials::new(id, secret, None, None, "static"));
            }
            (None, None) => {}
            _ => {
                return Err(StorageError::config_error(
                    "S3_ACCESS_KEY_ID and S3_SECRET_ACCESS_KEY must be set together",
                ))
            }
        }

        let shared = loader.load().await;

        let mut builder = Builder::from(&shared).force_path_style(config.force_path_style);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> StorageResult<(Self, S3Config)> {
        let config = S3Config::from_env()?;
        let client = Self::new(&config).await?;
        Ok((client, config))
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        debug!("Uploading {} to {}/{}", path.display(), bucket, key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        info!("Uploaded {} to {}/{}", path.display(), bucket, key);
        Ok(())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::presign_failed(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| StorageError::presign_failed(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn check_connectivity(&self, bucket: &str) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| StorageError::AwsSdk(format!("S3 connectivity check failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> S3Config {
        S3Config {
            bucket_name: "videos".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: Some("http://localhost:9000".to_string()),
            access_key_id: Some("minio".to_string()),
            secret_access_key: Some("minio-secret".to_string()),
            force_path_style: true,
        }
    }

    #[tokio::test]
    async fn test_presign_is_offline() {
        let client = S3Client::new(&config()).await.unwrap();

        let url = client
            .presign_get("videos", "landscape/abc", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:9000/videos/landscape/abc?"));
        assert!(url.contains("X-Amz-Expires=60"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn test_partial_credentials_rejected() {
        let mut cfg = config();
        cfg.secret_access_key = None;

        let err = S3Client::new(&cfg).await.err().unwrap();
        assert!(matches!(err, StorageError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_upload_missing_file_fails() {
        let client = S3Client::new(&config()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = client
            .put_file("videos", "other/x", &dir.path().join("missing.mp4"), "video/mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::UploadFailed(_)));
    }
}
