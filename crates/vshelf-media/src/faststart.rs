//! Fast-start remuxing.
//!
//! Moves the MP4 `moov` atom to the front of the file so playback can begin
//! before the whole file is downloaded. Streams are copied, never re-encoded.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Capability: rewrite a container for progressive playback.
#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Remux `input` into `output`. `output` may already exist and is overwritten.
    async fn remux_faststart(&self, input: &Path, output: &Path) -> MediaResult<()>;
}

/// [`Remuxer`] backed by the ffmpeg CLI.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRemuxer {
    runner: FfmpegRunner,
}

impl FfmpegRemuxer {
    pub fn new(binary: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            runner: FfmpegRunner::new()
                .with_binary(binary)
                .with_timeout(timeout),
        }
    }

    /// The command this remuxer runs.
    pub fn command(input: &Path, output: &Path) -> FfmpegCommand {
        FfmpegCommand::new(input, output)
            .codec_copy()
            .movflags("faststart")
            .format("mp4")
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    async fn remux_faststart(&self, input: &Path, output: &Path) -> MediaResult<()> {
        if !input.exists() {
            return Err(MediaError::FileNotFound(input.to_path_buf()));
        }

        self.runner.run(&Self::command(input, output)).await?;

        info!(
            "Remuxed for fast start: {} -> {}",
            input.display(),
            output.display()
        );
        Ok(())
    }
}
