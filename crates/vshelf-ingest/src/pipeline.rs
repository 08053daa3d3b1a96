//! The upload pipeline.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use futures_util::Stream;
use tracing::Instrument;

use vshelf_media::{Prober, Remuxer, StreamDimensions};
use vshelf_models::{
    classify_dimensions, AspectClass, StorageReference, VideoAsset, VideoId, SUPPORTED_VIDEO_TYPE,
};
use vshelf_storage::{route_key, ObjectStore, VideoUrlSigner};

use crate::config::IngestConfig;
use crate::error::{ErrorKind, UploadResult};
use crate::logging::SessionLogger;
use crate::metrics;
use crate::session::UploadSession;
use crate::staging::{processed_temp_path, stage_upload};

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Where the processed file now lives
    pub reference: StorageReference,
    pub class: AspectClass,
    pub dimensions: StreamDimensions,
    /// Size of the staged request body
    pub bytes: u64,
}

/// Stage, remux, classify and store uploads. Shared read-only across requests.
#[derive(Clone)]
pub struct UploadPipeline {
    config: Arc<IngestConfig>,
    remuxer: Arc<dyn Remuxer>,
    prober: Arc<dyn Prober>,
    store: Arc<dyn ObjectStore>,
    signer: VideoUrlSigner,
}

impl UploadPipeline {
    pub fn new(
        config: Arc<IngestConfig>,
        remuxer: Arc<dyn Remuxer>,
        prober: Arc<dyn Prober>,
        store: Arc<dyn ObjectStore>,
        signer: VideoUrlSigner,
    ) -> Self {
        Self {
            config,
            remuxer,
            prober,
            store,
            signer,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Run one upload through every stage.
    ///
    /// Stages run strictly in order and the first failure ends the session.
    /// Temp files are released when the session drops at the end of this call.
    pub async fn process<S, E>(
        &self,
        video_id: VideoId,
        body: S,
        declared_type: &str,
    ) -> UploadResult<UploadOutcome>
    where
        S: Stream<Item = Result<Bytes, E>> + Send,
        E: std::fmt::Display,
    {
        let mut session = UploadSession::new(video_id, declared_type);
        let span = session.logger().create_span();

        let result = self.run_stages(&mut session, body).instrument(span).await;

        match &result {
            Ok(outcome) => {
                metrics::record_upload_completed(outcome.class, outcome.bytes);
                session.logger().log_completion(&format!(
                    "{} ({}x{}, {})",
                    outcome.reference.key,
                    outcome.dimensions.width,
                    outcome.dimensions.height,
                    outcome.class
                ));
            }
            Err(e) => {
                metrics::record_upload_failed(e.kind());
            }
        }

        result
    }

    async fn run_stages<S, E>(
        &self,
        session: &mut UploadSession,
        body: S,
    ) -> UploadResult<UploadOutcome>
    where
        S: Stream<Item = Result<Bytes, E>> + Send,
        E: std::fmt::Display,
    {
        let logger = session.logger().clone();
        logger.log_start(session.media_type());

        // Stage
        let start = Instant::now();
        let staged = stage_upload(body, session.media_type(), &self.config)
            .await
            .inspect_err(|e| match e.kind() {
                ErrorKind::Validation => logger.log_rejected(&e.to_string()),
                _ => logger.log_error("stage", &e.to_string()),
            })?;
        let bytes = staged.size();
        let input = staged.path().to_path_buf();
        session.set_staged(staged);
        self.finish_stage(&logger, "stage", start);

        // Remux
        let start = Instant::now();
        let processed = processed_temp_path(&self.config.temp_dir)?;
        let output = processed.to_path_buf();
        session.set_processed(processed);
        self.remuxer
            .remux_faststart(&input, &output)
            .await
            .inspect_err(|e| logger.log_error("remux", &e.to_string()))?;
        session.release_staged();
        self.finish_stage(&logger, "remux", start);

        // Probe and classify
        let start = Instant::now();
        let dimensions = self
            .prober
            .probe_dimensions(&output)
            .await
            .inspect_err(|e| logger.log_error("probe", &e.to_string()))?;
        let class = classify_dimensions(dimensions.width, dimensions.height);
        self.finish_stage(&logger, "probe", start);

        // Route and upload
        let start = Instant::now();
        let key = route_key(class);
        self.store
            .put_file(&self.config.bucket, &key, &output, SUPPORTED_VIDEO_TYPE)
            .await
            .inspect_err(|e| logger.log_error("put", &e.to_string()))?;
        self.finish_stage(&logger, "put", start);

        Ok(UploadOutcome {
            reference: StorageReference::new(self.config.bucket.clone(), key),
            class,
            dimensions,
            bytes,
        })
    }

    fn finish_stage(&self, logger: &SessionLogger, stage: &'static str, start: Instant) {
        let elapsed = start.elapsed();
        metrics::record_stage_duration(stage, elapsed.as_secs_f64());
        logger.log_stage(stage, elapsed.as_millis());
    }

    /// Replace the persisted reference in `video_url` with a fresh signed URL.
    ///
    /// Assets without a video are returned unchanged.
    pub async fn sign_asset(&self, mut asset: VideoAsset) -> UploadResult<VideoAsset> {
        let Some(encoded) = asset.video_url.as_deref() else {
            return Ok(asset);
        };

        let reference = StorageReference::decode(encoded)?;
        let signed = self.signer.sign(&reference).await?;
        asset.video_url = Some(signed.url);

        Ok(asset)
    }
}

impl std::fmt::Debug for UploadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
