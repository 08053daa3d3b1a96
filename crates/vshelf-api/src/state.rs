//! Application state.

use std::sync::Arc;

use anyhow::{Context, Result};

use vshelf_ingest::{AssetRepository, IngestConfig, InMemoryAssetRepository, UploadPipeline};
use vshelf_media::{check_ffmpeg, check_ffprobe, FfmpegRemuxer, FfprobeProber};
use vshelf_storage::{DeliveryConfig, ObjectStore, S3Client, VideoUrlSigner};

use crate::auth::JwtVerifier;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: UploadPipeline,
    pub assets: Arc<dyn AssetRepository>,
    pub jwt: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(config: ApiConfig, pipeline: UploadPipeline, assets: Arc<dyn AssetRepository>) -> Self {
        let jwt = Arc::new(JwtVerifier::new(&config.jwt_secret));
        Self {
            config,
            pipeline,
            assets,
            jwt,
        }
    }

    /// Build production state from environment variables.
    pub async fn from_env(config: ApiConfig) -> Result<Self> {
        let (s3, s3_config) = S3Client::from_env()
            .await
            .context("Failed to create storage client")?;

        let ingest = IngestConfig::from_env(s3_config.bucket_name.clone());
        check_ffmpeg(&ingest.ffmpeg_path).context("ffmpeg is required")?;
        check_ffprobe(&ingest.ffprobe_path).context("ffprobe is required")?;
        std::fs::create_dir_all(&ingest.temp_dir)
            .with_context(|| format!("Failed to create {}", ingest.temp_dir.display()))?;

        let store: Arc<dyn ObjectStore> = Arc::new(s3);
        let signer = VideoUrlSigner::new(store.clone(), DeliveryConfig::from_env());
        let pipeline = UploadPipeline::new(
            Arc::new(ingest.clone()),
            Arc::new(FfmpegRemuxer::new(ingest.ffmpeg_path.clone(), ingest.tool_timeout)),
            Arc::new(FfprobeProber::new(ingest.ffprobe_path.clone(), ingest.tool_timeout)),
            store,
            signer,
        );

        Ok(Self::new(config, pipeline, Arc::new(InMemoryAssetRepository::new())))
    }
}
