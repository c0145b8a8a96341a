//! Bundle platform and file extension enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mobile platform a bundle targets.
///
/// Stored in the `platform_type` column as its integer discriminant.
/// Platform and file extension are a bijection; adding a platform means
/// extending both enums in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android, distributed as an `.apk` package.
    Android = 1,
    /// iOS, distributed as an `.ipa` package.
    Ios = 2,
}

impl Platform {
    /// The file extension bundles for this platform carry.
    pub fn extension(&self) -> FileExtension {
        match self {
            Self::Android => FileExtension::Apk,
            Self::Ios => FileExtension::Ipa,
        }
    }

    /// Return the platform as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// File extension of an uploaded bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileExtension {
    /// `.apk` — Android package.
    Apk,
    /// `.ipa` — iOS application archive.
    Ipa,
}

impl FileExtension {
    /// The platform this extension belongs to (inverse of
    /// [`Platform::extension`]).
    pub fn platform(&self) -> Platform {
        match self {
            Self::Apk => Platform::Android,
            Self::Ipa => Platform::Ios,
        }
    }

    /// Return the extension with its leading dot, as it appears in file
    /// names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apk => ".apk",
            Self::Ipa => ".ipa",
        }
    }

    /// MIME type used when uploading a binary with this extension.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Apk => "application/vnd.android.package-archive",
            Self::Ipa => "application/octet-stream",
        }
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileExtension {
    type Err = bundlehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            ".apk" => Ok(Self::Apk),
            ".ipa" => Ok(Self::Ipa),
            _ => Err(bundlehub_core::AppError::validation(format!(
                "Invalid bundle extension: '{s}'. Expected one of: .apk, .ipa"
            ))),
        }
    }
}
