//! Accepted upload media types.

use thiserror::Error;

/// The only container accepted for video uploads.
pub const SUPPORTED_VIDEO_TYPE: &str = "video/mp4";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaTypeError {
    #[error("Invalid media type: {0}")]
    Invalid(String),
}

/// Parse a Content-Type header value and return its essence (`type/subtype`),
/// lowercased and without parameters.
pub fn essence_of(content_type: &str) -> Result<String, MediaTypeError> {
    let parsed: mime::Mime = content_type
        .trim()
        .parse()
        .map_err(|_| MediaTypeError::Invalid(content_type.to_string()))?;

    Ok(parsed.essence_str().to_ascii_lowercase())
}
