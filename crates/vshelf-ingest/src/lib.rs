//! Video upload pipeline.
//!
//! An upload flows strictly downstream through:
//! 1. Staging the request body to a temp file (type and size checked)
//! 2. Fast-start remux into a second temp file
//! 3. Probing dimensions and classifying the aspect ratio
//! 4. Routing to a storage key and uploading
//!
//! Temp files belong to the [`UploadSession`] and are removed when it drops,
//! whichever stage ends it.

pub mod assets;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod session;
pub mod staging;

pub use assets::{AssetRepository, InMemoryAssetRepository};
pub use config::IngestConfig;
pub use error::{ErrorKind, RepositoryError, UploadError, UploadResult};
pub use logging::SessionLogger;
pub use pipeline::{UploadOutcome, UploadPipeline};
pub use session::UploadSession;
pub use staging::{stage_upload, validate_media_type, StagedFile};

#[cfg(any(test, feature = "mock"))]
pub use assets::MockAssetRepository;
