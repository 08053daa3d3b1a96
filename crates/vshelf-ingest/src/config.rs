//! Ingest configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default upload size limit (1 GiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1 << 30;

/// Default limit for a single ffmpeg/ffprobe run.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 300;

/// Upload pipeline configuration. Built once at startup.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Destination bucket for processed uploads
    pub bucket: String,
    /// Maximum accepted body size in bytes
    pub max_upload_bytes: u64,
    /// Directory for staged and processed temp files
    pub temp_dir: PathBuf,
    /// Per-invocation limit for external tools; `None` waits indefinitely
    pub tool_timeout: Option<Duration>,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
}

impl IngestConfig {
    /// Defaults for the given bucket.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            temp_dir: std::env::temp_dir(),
            tool_timeout: Some(Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS)),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }

    /// Create config from environment variables.
    ///
    /// The bucket comes from the storage configuration.
    pub fn from_env(bucket: impl Into<String>) -> Self {
        let defaults = Self::new(bucket);

        Self {
            max_upload_bytes: std::env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            temp_dir: std::env::var("UPLOAD_TEMP_DIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
            tool_timeout: timeout_from_secs(
                std::env::var("MEDIA_TOOL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TOOL_TIMEOUT_SECS),
            ),
            ffmpeg_path: std::env::var("FFMPEG_PATH").unwrap_or(defaults.ffmpeg_path),
            ffprobe_path: std::env::var("FFPROBE_PATH").unwrap_or(defaults.ffprobe_path),
            bucket: defaults.bucket,
        }
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}

/// `0` disables the timeout.
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
