//! Remote file store trait for pluggable binary storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for remote blob stores that hold uploaded application binaries.
///
/// Unlike a path-addressed filesystem, the store assigns an opaque file id
/// on upload; every later operation addresses the blob by that id. The
/// [`RemoteFileStore`] trait is defined here in `bundlehub-core` and
/// implemented in `bundlehub-storage`.
#[async_trait]
pub trait RemoteFileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "google_drive").
    fn provider_type(&self) -> &str;

    /// Upload a binary and return the opaque file id the store assigned.
    async fn upload(&self, name: &str, mime_type: &str, data: Bytes) -> AppResult<String>;

    /// Download a binary by its file id.
    async fn download(&self, file_id: &str) -> AppResult<Bytes>;

    /// Delete a binary by its file id.
    async fn delete(&self, file_id: &str) -> AppResult<()>;
}
