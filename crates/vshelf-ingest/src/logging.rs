//! Structured upload session logging.

use tracing::{error, info, warn, Span};

use vshelf_models::VideoId;

/// Logger carrying the session and video ids on every event.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session_id: String,
    video_id: String,
}

impl SessionLogger {
    pub fn new(session_id: &str, video_id: &VideoId) -> Self {
        Self {
            session_id: session_id.to_string(),
            video_id: video_id.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            video_id = %self.video_id,
            "Upload started: {}", message
        );
    }

    /// Log a completed stage with its duration.
    pub fn log_stage(&self, stage: &str, elapsed_ms: u128) {
        info!(
            session_id = %self.session_id,
            video_id = %self.video_id,
            stage,
            elapsed_ms = elapsed_ms as u64,
            "Upload stage complete: {}", stage
        );
    }

    pub fn log_rejected(&self, message: &str) {
        warn!(
            session_id = %self.session_id,
            video_id = %self.video_id,
            "Upload rejected: {}", message
        );
    }

    pub fn log_error(&self, stage: &str, message: &str) {
        error!(
            session_id = %self.session_id,
            video_id = %self.video_id,
            stage,
            "Upload failed: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            video_id = %self.video_id,
            "Upload completed: {}", message
        );
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Span wrapping the whole session.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "upload_session",
            session_id = %self.session_id,
            video_id = %self.video_id
        )
    }
}
