//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; the API binary installs the
//! Prometheus recorder.

use metrics::{counter, histogram};

use vshelf_models::AspectClass;

use crate::error::ErrorKind;

pub mod names {
    pub const UPLOAD_STAGE_DURATION_SECONDS: &str = "vshelf_upload_stage_duration_seconds";
    pub const UPLOADS_COMPLETED_TOTAL: &str = "vshelf_uploads_completed_total";
    pub const UPLOADS_FAILED_TOTAL: &str = "vshelf_uploads_failed_total";
    pub const UPLOAD_BYTES_TOTAL: &str = "vshelf_upload_bytes_total";
}

/// Record how long a pipeline stage took.
pub fn record_stage_duration(stage: &'static str, duration_secs: f64) {
    histogram!(names::UPLOAD_STAGE_DURATION_SECONDS, "stage" => stage).record(duration_secs);
}

/// Record a completed upload.
pub fn record_upload_completed(class: AspectClass, bytes: u64) {
    counter!(names::UPLOADS_COMPLETED_TOTAL, "aspect" => class.as_str()).increment(1);
    counter!(names::UPLOAD_BYTES_TOTAL).increment(bytes);
}

/// Record a failed upload.
pub fn record_upload_failed(kind: ErrorKind) {
    counter!(names::UPLOADS_FAILED_TOTAL, "kind" => kind.as_str()).increment(1);
}
