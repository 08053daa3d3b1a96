//! Per-request upload state.

use std::path::Path;

use tempfile::TempPath;
use uuid::Uuid;

use vshelf_models::VideoId;

use crate::logging::SessionLogger;
use crate::staging::StagedFile;

/// One upload request in flight.
///
/// Owns both temp files. Dropping the session removes whichever of them still
/// exist, so every early return and unwinding panic cleans up.
#[derive(Debug)]
pub struct UploadSession {
    media_type: String,
    staged: Option<StagedFile>,
    processed: Option<TempPath>,
    logger: SessionLogger,
}

impl UploadSession {
    pub fn new(video_id: VideoId, media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            staged: None,
            processed: None,
            logger: SessionLogger::new(&Uuid::new_v4().to_string(), &video_id),
        }
    }

    /// Declared media type as sent by the client.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn logger(&self) -> &SessionLogger {
        &self.logger
    }

    pub fn set_staged(&mut self, staged: StagedFile) {
        self.staged = Some(staged);
    }

    pub fn staged_path(&self) -> Option<&Path> {
        self.staged.as_ref().map(StagedFile::path)
    }

    /// Remove the staged file now; it is not needed once remuxed.
    pub fn release_staged(&mut self) {
        self.staged = None;
    }

    pub fn set_processed(&mut self, path: TempPath) {
        self.processed = Some(path);
    }

    pub fn processed_path(&self) -> Option<&Path> {
        self.processed.as_deref()
    }
}
