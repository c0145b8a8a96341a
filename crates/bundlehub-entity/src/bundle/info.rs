//! Metadata extracted from an uploaded binary.

use serde::{Deserialize, Serialize};

/// Metadata read out of an uploaded `.apk`/`.ipa` before it is inserted.
///
/// This is construction-time data only; it is never persisted as its own
/// row. The version string is copied into the bundle row at insert time,
/// so callers cannot set the persisted version directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleInfo {
    /// Version string declared by the binary (e.g. `CFBundleShortVersionString`).
    pub version: String,
    /// Package/bundle identifier, when the parser could extract one.
    pub identifier: Option<String>,
    /// Display title declared by the binary, when present.
    pub title: Option<String>,
}

impl BundleInfo {
    /// Metadata carrying only a version string.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            identifier: None,
            title: None,
        }
    }
}
