//! Persisted storage references.
//!
//! An uploaded video is identified by the bucket it lives in and its key. The
//! pair is persisted on the asset record as a single `bucket,key` string.
//!
//! Decoding splits on the first delimiter only. Bucket names therefore must not
//! contain `,`; keys may, since everything after the first delimiter is taken as
//! the key. Nothing is escaped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between bucket and key in the persisted form.
pub const REFERENCE_DELIMITER: char = ',';

/// Errors decoding a persisted reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Malformed storage reference, expected 'bucket{REFERENCE_DELIMITER}key': {0}")]
    MissingDelimiter(String),
}

/// Location of an object in the object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageReference {
    pub bucket: String,
    pub key: String,
}

impl StorageReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Encode into the persisted `bucket,key` form.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a persisted reference.
    pub fn decode(value: &str) -> Result<Self, ReferenceError> {
        let (bucket, key) = value
            .split_once(REFERENCE_DELIMITER)
            .ok_or_else(|| ReferenceError::MissingDelimiter(value.to_string()))?;

        Ok(Self::new(bucket, key))
    }
}

impl fmt::Display for StorageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.bucket, REFERENCE_DELIMITER, self.key)
    }
}

impl FromStr for StorageReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
