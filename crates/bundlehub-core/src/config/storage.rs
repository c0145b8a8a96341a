//! Remote storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which remote store to use. Only `"google_drive"` is implemented.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Google Drive configuration.
    #[serde(default)]
    pub google_drive: GoogleDriveConfig,
}

/// Google Drive remote store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleDriveConfig {
    /// OAuth2 bearer token used for Drive API calls.
    #[serde(default)]
    pub access_token: String,
    /// Optional Drive folder id uploads are placed under.
    #[serde(default)]
    pub folder_id: String,
    /// API endpoint override, for tests against a local stub.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Upload endpoint override.
    #[serde(default = "default_upload_base")]
    pub upload_base: String,
}

impl Default for GoogleDriveConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            folder_id: String::new(),
            api_base: default_api_base(),
            upload_base: default_upload_base(),
        }
    }
}

fn default_provider() -> String {
    "google_drive".to_string()
}

fn default_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_upload_base() -> String {
    "https://www.googleapis.com/upload/drive/v3".to_string()
}
