//! Bundle entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::info::BundleInfo;
use super::platform::{FileExtension, Platform};

/// A persisted application bundle.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bundle {
    /// Unique bundle identifier, assigned by the database.
    pub id: i64,
    /// The application this bundle belongs to.
    pub app_id: i64,
    /// Opaque identifier of the binary in the remote file store.
    pub file_id: String,
    /// Target platform.
    #[sqlx(rename = "platform_type")]
    pub platform: Platform,
    /// Version string, copied from the binary's metadata at insert time.
    #[sqlx(rename = "bundle_version")]
    pub version: String,
    /// Build counter within the owning app.
    pub revision: i32,
    /// Free-text description.
    pub description: String,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Bundle {
    /// Whether this bundle is an Android package.
    pub fn is_apk(&self) -> bool {
        self.platform == Platform::Android
    }

    /// Whether this bundle is an iOS application archive.
    pub fn is_ipa(&self) -> bool {
        self.platform == Platform::Ios
    }

    /// The file extension implied by the platform.
    pub fn extension(&self) -> FileExtension {
        self.platform.extension()
    }

    /// Apply an update to this row in memory.
    ///
    /// Only the description and, when the incoming value is non-empty, the
    /// file id are writable through updates; everything else is immutable
    /// after insert. Stamps `updated_at` with the supplied instant.
    pub fn apply_update(&mut self, changes: &UpdateBundle, now: DateTime<Utc>) {
        self.description = changes.description.clone();
        if !changes.file_id.is_empty() {
            self.file_id = changes.file_id.clone();
        }
        self.updated_at = now;
    }
}

/// Construction context for a bundle that has not been inserted yet.
///
/// Carries the transient upload-time data (parsed binary metadata, display
/// name) that never lands in the durable row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBundle {
    /// The owning application.
    pub app_id: i64,
    /// Target platform.
    pub platform: Platform,
    /// Remote-store id of the already-uploaded binary.
    pub file_id: String,
    /// Build counter within the owning app.
    pub revision: i32,
    /// Free-text description.
    pub description: String,
    /// Metadata parsed from the uploaded binary.
    pub info: BundleInfo,
    /// Name the uploaded file arrived under, when known.
    pub display_name: Option<String>,
}

impl NewBundle {
    /// Deterministic name the binary is stored under remotely.
    ///
    /// `app_{appId}_ver_{version}_rev_{revision}{ext}`, where the version
    /// comes from the parsed metadata and the extension from the platform.
    pub fn storage_file_name(&self) -> String {
        format!(
            "app_{}_ver_{}_rev_{}{}",
            self.app_id,
            self.info.version,
            self.revision,
            self.platform.extension()
        )
    }

    /// Freeze this context into the column values for the INSERT.
    ///
    /// The persisted version is copied from the parsed metadata and both
    /// timestamps are stamped with the same instant. This is the explicit
    /// replacement for an ORM pre-insert callback.
    pub fn into_insert(self, now: DateTime<Utc>) -> BundleInsert {
        BundleInsert {
            app_id: self.app_id,
            file_id: self.file_id,
            platform: self.platform,
            version: self.info.version,
            revision: self.revision,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Column values for inserting a bundle row.
#[derive(Debug, Clone)]
pub struct BundleInsert {
    /// The owning application.
    pub app_id: i64,
    /// Remote-store id of the binary.
    pub file_id: String,
    /// Target platform.
    pub platform: Platform,
    /// Version copied from the binary metadata.
    pub version: String,
    /// Build counter.
    pub revision: i32,
    /// Free-text description.
    pub description: String,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Insert timestamp (equal to `created_at`).
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of an existing bundle.
///
/// An empty `file_id` means "keep the stored one".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBundle {
    /// New description.
    pub description: String,
    /// Replacement remote-store file id, or empty to leave unchanged.
    #[serde(default)]
    pub file_id: String,
}
