//! Google Drive remote file store.
//!
//! Talks to the Drive v3 REST API. Uploads happen in two steps: a media
//! upload that yields the file id, then a metadata patch setting the file
//! name (and parent folder, when configured).

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, info};

use bundlehub_core::config::storage::GoogleDriveConfig;
use bundlehub_core::error::{AppError, ErrorKind};
use bundlehub_core::result::AppResult;
use bundlehub_core::traits::storage::RemoteFileStore;

/// Google Drive remote file store.
#[derive(Debug, Clone)]
pub struct GoogleDriveStore {
    client: reqwest::Client,
    access_token: String,
    folder_id: String,
    api_base: String,
    upload_base: String,
}

/// The subset of a Drive file resource we read back.
#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

impl GoogleDriveStore {
    /// Create a new Drive store from configuration.
    pub fn new(config: &GoogleDriveConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: config.access_token.clone(),
            folder_id: config.folder_id.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_base: config.upload_base.trim_end_matches('/').to_string(),
        }
    }

    /// Metadata endpoint for one file.
    fn file_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.api_base, file_id)
    }

    /// Media-upload endpoint.
    fn upload_url(&self) -> String {
        format!("{}/files?uploadType=media", self.upload_base)
    }

    /// Metadata-patch endpoint for the post-upload rename.
    ///
    /// Drive rejects `parents` in update-request bodies; folder placement
    /// must go through the `addParents` query parameter.
    fn rename_url(&self, file_id: &str) -> String {
        if self.folder_id.is_empty() {
            self.file_url(file_id)
        } else {
            format!("{}?addParents={}", self.file_url(file_id), self.folder_id)
        }
    }

    /// Map a non-success Drive response to an [`AppError`].
    async fn api_error(operation: &str, response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            AppError::not_found(format!("Drive file not found ({operation})"))
        } else {
            AppError::external_service(format!(
                "Drive {operation} failed with status {status}: {body}"
            ))
        }
    }
}

#[async_trait]
impl RemoteFileStore for GoogleDriveStore {
    fn provider_type(&self) -> &str {
        "google_drive"
    }

    async fn upload(&self, name: &str, mime_type: &str, data: Bytes) -> AppResult<String> {
        let size = data.len();
        let response = self
            .client
            .post(self.upload_url())
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(data)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Drive upload request failed", e)
            })?;

        if !response.status().is_success() {
            return Err(Self::api_error("upload", response).await);
        }

        let file: DriveFile = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Drive upload returned an unreadable file resource",
                e,
            )
        })?;

        let patch = self
            .client
            .patch(self.rename_url(&file.id))
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Drive rename request failed", e)
            })?;

        if !patch.status().is_success() {
            return Err(Self::api_error("rename", patch).await);
        }

        info!(file_id = %file.id, name, bytes = size, "Uploaded binary to Drive");
        Ok(file.id)
    }

    async fn download(&self, file_id: &str) -> AppResult<Bytes> {
        let response = self
            .client
            .get(format!("{}?alt=media", self.file_url(file_id)))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Drive download request failed",
                    e,
                )
            })?;

        if !response.status().is_success() {
            return Err(Self::api_error("download", response).await);
        }

        let data = response.bytes().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Drive download body failed", e)
        })?;

        debug!(file_id, bytes = data.len(), "Downloaded binary from Drive");
        Ok(data)
    }

    async fn delete(&self, file_id: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.file_url(file_id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Drive delete request failed", e)
            })?;

        if !response.status().is_success() {
            return Err(Self::api_error("delete", response).await);
        }

        info!(file_id, "Deleted binary from Drive");
        Ok(())
    }
}
