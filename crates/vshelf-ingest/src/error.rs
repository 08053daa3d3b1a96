//! Upload error types.

use thiserror::Error;

use vshelf_media::MediaError;
use vshelf_models::{ReferenceError, VideoId};
use vshelf_storage::StorageError;

pub type UploadResult<T> = Result<T, UploadError>;

/// Coarse failure class of an upload or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller sent something unacceptable
    Validation,
    /// Staging, remux or probe failed
    Processing,
    /// Object store upload or signing failed
    Storage,
    /// A persisted reference could not be decoded
    Format,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Processing => "processing",
            ErrorKind::Storage => "storage",
            ErrorKind::Format => "format",
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("No video file in request")]
    MissingFile,

    #[error("Upload exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    #[error("Media processing failed: {0}")]
    Media(#[from] MediaError),

    #[error("Failed to stage upload: {0}")]
    Staging(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid stored reference: {0}")]
    Format(#[from] ReferenceError),
}

impl UploadError {
    pub fn unsupported_media_type(declared: impl Into<String>) -> Self {
        Self::UnsupportedMediaType(declared.into())
    }

    pub fn body_read(msg: impl Into<String>) -> Self {
        Self::BodyRead(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::UnsupportedMediaType(_)
            | UploadError::MissingFile
            | UploadError::TooLarge { .. }
            | UploadError::BodyRead(_) => ErrorKind::Validation,
            UploadError::Media(_) | UploadError::Staging(_) => ErrorKind::Processing,
            UploadError::Storage(_) => ErrorKind::Storage,
            UploadError::Format(_) => ErrorKind::Format,
        }
    }
}

/// Errors from the asset persistence collaborator.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Video not found: {0}")]
    NotFound(VideoId),

    #[error("Video already exists: {0}")]
    AlreadyExists(VideoId),

    #[error("Repository backend error: {0}")]
    Backend(String),
}
