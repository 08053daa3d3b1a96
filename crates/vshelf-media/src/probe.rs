//! FFprobe stream dimensions.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::command::run_tool;
use crate::error::{MediaError, MediaResult};

/// Width and height of the first stream in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDimensions {
    pub width: i64,
    pub height: i64,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

/// ffprobe reports dimensions as C ints; anything wider is malformed output.
#[derive(Debug, Deserialize)]
struct FfprobeStream {
    #[serde(default)]
    width: i32,
    #[serde(default)]
    height: i32,
}

/// Capability: inspect a media file's stream dimensions.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe_dimensions(&self, path: &Path) -> MediaResult<StreamDimensions>;
}

/// [`Prober`] backed by the ffprobe CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: String,
    timeout: Option<Duration>,
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe", None)
    }
}

impl FfprobeProber {
    pub fn new(binary: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Prober for FfprobeProber {
    async fn probe_dimensions(&self, path: &Path) -> MediaResult<StreamDimensions> {
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }

        which::which(&self.binary).map_err(|_| MediaError::tool_not_found(&self.binary))?;

        let mut command = Command::new(&self.binary);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path);

        let output = run_tool(command, "ffprobe", self.timeout).await?;

        if !output.status.success() {
            return Err(MediaError::ffprobe_failed(
                "FFprobe failed",
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        let dimensions = parse_probe_output(&output.stdout)?;
        debug!(
            "Probed {}: {}x{}",
            path.display(),
            dimensions.width,
            dimensions.height
        );
        Ok(dimensions)
    }
}

/// Parse `ffprobe -print_format json -show_streams` output.
///
/// Only the first stream is considered. A stream without width/height (e.g. an
/// audio-first file) reads as 0x0.
pub fn parse_probe_output(stdout: &[u8]) -> MediaResult<StreamDimensions> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)?;

    let first = probe.streams.first().ok_or(MediaError::NoStreams)?;

    Ok(StreamDimensions {
        width: i64::from(first.width),
        height: i64::from(first.height),
    })
}
