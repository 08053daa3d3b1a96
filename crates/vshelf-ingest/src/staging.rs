//! Ingress staging: inbound body to a local temp file.

use std::path::Path;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use vshelf_models::{essence_of, SUPPORTED_VIDEO_TYPE};

use crate::config::IngestConfig;
use crate::error::{UploadError, UploadResult};

/// Temp file name prefix for staged request bodies.
pub const STAGED_PREFIX: &str = "vshelf-upload-";

/// Temp file name prefix for remuxed output.
pub const PROCESSED_PREFIX: &str = "vshelf-processed-";

/// A request body written to disk. The file is removed when this drops.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    size: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Accept only `video/mp4`, ignoring parameters and case.
pub fn validate_media_type(declared: &str) -> UploadResult<()> {
    match essence_of(declared) {
        Ok(essence) if essence == SUPPORTED_VIDEO_TYPE => Ok(()),
        _ => Err(UploadError::unsupported_media_type(declared)),
    }
}

/// Create an empty, uniquely named temp file for remux output.
pub fn processed_temp_path(temp_dir: &Path) -> UploadResult<TempPath> {
    let file = tempfile::Builder::new()
        .prefix(PROCESSED_PREFIX)
        .suffix(".mp4")
        .tempfile_in(temp_dir)?;
    Ok(file.into_temp_path())
}

/// Stage an inbound byte stream.
///
/// The declared type is checked before anything touches the filesystem. The
/// byte count is checked per chunk against `max_upload_bytes`. On any error
/// the handle is closed and the partial file removed before returning.
pub async fn stage_upload<S, E>(
    stream: S,
    declared_type: &str,
    config: &IngestConfig,
) -> UploadResult<StagedFile>
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: std::fmt::Display,
{
    validate_media_type(declared_type)?;

    let (file, path) = tempfile::Builder::new()
        .prefix(STAGED_PREFIX)
        .suffix(".mp4")
        .tempfile_in(&config.temp_dir)?
        .into_parts();

    let size = copy_bounded(
        stream,
        tokio::fs::File::from_std(file),
        config.max_upload_bytes,
    )
    .await?;

    debug!("Staged {} bytes at {}", size, path.display());
    Ok(StagedFile { path, size })
}

/// Copy a stream into `file`, failing once more than `limit` bytes arrive.
/// Takes the file by value so it is closed before the caller sees the result.
async fn copy_bounded<S, E>(stream: S, mut file: tokio::fs::File, limit: u64) -> UploadResult<u64>
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: std::fmt::Display,
{
    futures_util::pin_mut!(stream);

    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| UploadError::body_read(e.to_string()))?;

        written += chunk.len() as u64;
        if written > limit {
            return Err(UploadError::TooLarge { limit });
        }

        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(written)
}
