//! Aspect classification of probed video streams.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Aspect bucket a video is filed under.
///
/// Derived once from the first stream's dimensions and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectClass {
    /// 16:9
    Landscape,
    /// 9:16
    Portrait,
    /// Anything else
    Other,
}

impl AspectClass {
    /// All classes, in classification order.
    pub const ALL: [AspectClass; 3] = [
        AspectClass::Landscape,
        AspectClass::Portrait,
        AspectClass::Other,
    ];

    /// Ratio label ("16:9", "9:16", "other").
    pub fn ratio(&self) -> &'static str {
        match self {
            AspectClass::Landscape => "16:9",
            AspectClass::Portrait => "9:16",
            AspectClass::Other => "other",
        }
    }

    /// Storage key path segment, including the trailing slash.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            AspectClass::Landscape => "landscape/",
            AspectClass::Portrait => "portrait/",
            AspectClass::Other => "other/",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectClass::Landscape => "landscape",
            AspectClass::Portrait => "portrait",
            AspectClass::Other => "other",
        }
    }
}

impl fmt::Display for AspectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a width/height pair.
///
/// Uses truncating integer division on both checks, so pairs that are only
/// approximately 16:9 (e.g. 1366x768) fall through to [`AspectClass::Other`].
/// Existing stored keys depend on this exact rule. Sizes too large to scale
/// are `Other`.
pub fn classify_dimensions(width: i64, height: i64) -> AspectClass {
    let scaled = |side: i64| side.checked_mul(16).map(|v| v / 9);

    if scaled(height) == Some(width) {
        AspectClass::Landscape
    } else if scaled(width) == Some(height) {
        AspectClass::Portrait
    } else {
        AspectClass::Other
    }
}
