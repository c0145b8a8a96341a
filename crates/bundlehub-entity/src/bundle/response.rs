//! JSON response payload for a bundle.

use serde::{Deserialize, Serialize};

use bundlehub_core::AppResult;
use bundlehub_core::types::UrlBuilder;

use super::model::Bundle;

/// The payload returned to clients for a single bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleResponse {
    /// Remote-store file id.
    pub file_id: String,
    /// Bundle version.
    pub version: String,
    /// Build counter.
    pub revision: i32,
    /// Absolute link that triggers installation.
    pub install_url: String,
    /// Absolute link to the bundle page, suitable for a QR code.
    pub qr_code_url: String,
}

impl Bundle {
    /// Build the client payload for this bundle.
    ///
    /// Both links resolve through the configured public base URL; fails if
    /// either link cannot be built.
    pub fn to_response(&self, urls: &UrlBuilder) -> AppResult<BundleResponse> {
        let install_url = urls.url_for(&format!("bundle/{}/download", self.id))?;
        let qr_code_url = urls.url_for(&format!("bundle/{}", self.id))?;

        Ok(BundleResponse {
            file_id: self.file_id.clone(),
            version: self.version.clone(),
            revision: self.revision,
            install_url: install_url.into(),
            qr_code_url: qr_code_url.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::platform::Platform;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_to_response_urls() {
        let bundle = Bundle {
            id: 42,
            app_id: 7,
            file_id: "drive-abc".to_string(),
            platform: Platform::Ios,
            version: "3.1".to_string(),
            revision: 9,
            description: String::new(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        };
        let urls = UrlBuilder::new("https://dist.example.com").unwrap();

        let response = bundle.to_response(&urls).unwrap();
        assert_eq!(response.file_id, "drive-abc");
        assert_eq!(response.version, "3.1");
        assert_eq!(response.revision, 9);
        assert_eq!(
            response.install_url,
            "https://dist.example.com/bundle/42/download"
        );
        assert_eq!(response.qr_code_url, "https://dist.example.com/bundle/42");
    }

    #[test]
    fn test_response_serializes_with_snake_case_keys() {
        let response = BundleResponse {
            file_id: "f".to_string(),
            version: "1.0".to_string(),
            revision: 1,
            install_url: "http://x/bundle/1/download".to_string(),
            qr_code_url: "http://x/bundle/1".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["file_id"], "f");
        assert_eq!(json["install_url"], "http://x/bundle/1/download");
        assert_eq!(json["qr_code_url"], "http://x/bundle/1");
    }
}
