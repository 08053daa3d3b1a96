//! FFmpeg CLI wrappers for upload normalization.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Tool execution with optional timeout (child killed on expiry)
//! - Fast-start remuxing behind the [`Remuxer`] capability
//! - Stream dimension probing behind the [`Prober`] capability

pub mod command;
pub mod error;
pub mod faststart;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, run_tool, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use faststart::{FfmpegRemuxer, Remuxer};
pub use probe::{parse_probe_output, FfprobeProber, Prober, StreamDimensions};
