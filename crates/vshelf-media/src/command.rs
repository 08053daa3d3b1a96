//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
        }
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Copy all streams without re-encoding.
    pub fn codec_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Set container muxer flags (e.g. `faststart`).
    pub fn movflags(self, flags: impl Into<String>) -> Self {
        self.output_arg("-movflags").output_arg(flags)
    }

    /// Force the output container format.
    pub fn format(self, format: impl Into<String>) -> Self {
        self.output_arg("-f").output_arg(format)
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push("error".to_string());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with an optional timeout.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    /// Binary name or path
    binary: String,
    /// Kill the process after this long
    timeout: Option<Duration>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRunner {
    /// Create a new runner using `ffmpeg` from PATH.
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
            timeout: None,
        }
    }

    /// Use a specific ffmpeg binary.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set timeout. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run an FFmpeg command to completion.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        which::which(&self.binary).map_err(|_| MediaError::tool_not_found(&self.binary))?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: {} {}", self.binary, args.join(" "));

        let mut command = Command::new(&self.binary);
        command.args(&args);

        let output = run_tool(command, "ffmpeg", self.timeout).await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
                output.status.code(),
            ))
        }
    }
}

/// Spawn an external tool and collect its output.
///
/// The child is spawned with `kill_on_drop`, so when the timeout fires and the
/// wait future is dropped the process is killed rather than left running.
/// A non-zero exit status is not an error here; callers inspect `status`.
pub async fn run_tool(
    mut command: Command,
    tool: &str,
    timeout: Option<Duration>,
) -> MediaResult<Output> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command.spawn()?;
    let wait = child.wait_with_output();

    match timeout {
        Some(limit) => match tokio::time::timeout(limit, wait).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!("{} timed out after {:?}, killing process", tool, limit);
                Err(MediaError::Timeout {
                    tool: tool.to_string(),
                    secs: limit.as_secs(),
                })
            }
        },
        None => Ok(wait.await?),
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg(binary: &str) -> MediaResult<PathBuf> {
    which::which(binary).map_err(|_| MediaError::tool_not_found(binary))
}

/// Check if FFprobe is available.
pub fn check_ffprobe(binary: &str) -> MediaResult<PathBuf> {
    which::which(binary).map_err(|_| MediaError::tool_not_found(binary))
}
