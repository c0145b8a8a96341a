//! Bundle CRUD, rendering, and remote-store coordination.

use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use url::Url;

use bundlehub_core::error::AppError;
use bundlehub_core::result::AppResult;
use bundlehub_core::traits::storage::RemoteFileStore;
use bundlehub_core::types::UrlBuilder;
use bundlehub_database::repositories::{AppStore, BundleStore};
use bundlehub_entity::app::model::App;
use bundlehub_entity::bundle::manifest::InstallManifest;
use bundlehub_entity::bundle::model::{Bundle, NewBundle, UpdateBundle};
use bundlehub_entity::bundle::response::BundleResponse;

/// Handles the bundle lifecycle across the database and the remote store.
#[derive(Debug, Clone)]
pub struct BundleService {
    /// Bundle persistence.
    bundle_repo: Arc<dyn BundleStore>,
    /// Application lookups (for owner resolution).
    app_repo: Arc<dyn AppStore>,
    /// Remote store holding the uploaded binaries.
    store: Arc<dyn RemoteFileStore>,
    /// Public link builder.
    urls: UrlBuilder,
}

impl BundleService {
    /// Creates a new bundle service.
    pub fn new(
        bundle_repo: Arc<dyn BundleStore>,
        app_repo: Arc<dyn AppStore>,
        store: Arc<dyn RemoteFileStore>,
        urls: UrlBuilder,
    ) -> Self {
        Self {
            bundle_repo,
            app_repo,
            store,
            urls,
        }
    }

    /// Inserts a bundle whose binary is already in the remote store.
    pub async fn create_bundle(&self, new: NewBundle) -> AppResult<Bundle> {
        validate_display_name(&new)?;

        let bundle = self.bundle_repo.create(new).await?;
        info!(
            bundle_id = bundle.id,
            app_id = bundle.app_id,
            platform = %bundle.platform,
            version = %bundle.version,
            "Created bundle"
        );
        Ok(bundle)
    }

    /// Uploads a binary to the remote store, then inserts the bundle row.
    ///
    /// The binary is stored under the deterministic
    /// `app_{appId}_ver_{version}_rev_{revision}{ext}` name. The row is
    /// inserted only after the upload succeeded, so a failed upload leaves
    /// no database trace.
    pub async fn upload_and_create(&self, mut new: NewBundle, data: Bytes) -> AppResult<Bundle> {
        validate_display_name(&new)?;

        let name = new.storage_file_name();
        let mime = new.platform.extension().mime_type();
        new.file_id = self.store.upload(&name, mime, data).await?;

        self.create_bundle(new).await
    }

    /// Gets a single bundle by id.
    pub async fn get_bundle(&self, id: i64) -> AppResult<Bundle> {
        self.bundle_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Bundle {id} not found")))
    }

    /// Gets the bundle holding the given remote-store file id.
    pub async fn get_bundle_by_file_id(&self, file_id: &str) -> AppResult<Bundle> {
        self.bundle_repo.find_by_file_id(file_id).await
    }

    /// Lists all bundles of an app, newest revision first.
    pub async fn list_bundles(&self, app_id: i64) -> AppResult<Vec<Bundle>> {
        self.bundle_repo.find_by_app(app_id).await
    }

    /// Updates a bundle's description and, when non-empty, its file id.
    pub async fn update_bundle(&self, id: i64, changes: UpdateBundle) -> AppResult<Bundle> {
        let bundle = self.bundle_repo.update(id, &changes).await?;
        info!(bundle_id = id, "Updated bundle");
        Ok(bundle)
    }

    /// Deletes a bundle row, then its binary in the remote store.
    ///
    /// The row goes first: when that fails the remote file is untouched.
    /// When the remote delete fails afterwards the error still propagates,
    /// leaving an orphaned blob behind; the inconsistency is logged, not
    /// compensated.
    pub async fn delete_bundle(&self, id: i64) -> AppResult<()> {
        let bundle = self.get_bundle(id).await?;

        self.bundle_repo.delete(bundle.id).await?;

        if let Err(e) = self.store.delete(&bundle.file_id).await {
            warn!(
                bundle_id = bundle.id,
                file_id = %bundle.file_id,
                error = %e,
                "Bundle row deleted but remote file removal failed; blob is orphaned"
            );
            return Err(e);
        }

        info!(bundle_id = id, "Deleted bundle");
        Ok(())
    }

    /// Downloads a bundle's binary from the remote store.
    pub async fn download_binary(&self, bundle: &Bundle) -> AppResult<Bytes> {
        self.store.download(&bundle.file_id).await
    }

    /// Looks up the application owning a bundle.
    pub async fn owning_app(&self, bundle: &Bundle) -> AppResult<App> {
        self.app_repo
            .find_by_id(bundle.app_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("App {} not found", bundle.app_id)))
    }

    /// Builds the OTA installation manifest for an iOS bundle.
    pub async fn install_manifest(
        &self,
        bundle: &Bundle,
        ipa_url: &Url,
    ) -> AppResult<InstallManifest> {
        let app = self.owning_app(bundle).await?;
        Ok(InstallManifest::new(
            app.title,
            bundle.version.clone(),
            ipa_url.as_str(),
        ))
    }

    /// Builds the OTA installation manifest as a readable byte stream.
    pub async fn install_manifest_reader(
        &self,
        bundle: &Bundle,
        ipa_url: &Url,
    ) -> AppResult<impl Read> {
        let manifest = self.install_manifest(bundle, ipa_url).await?;
        Ok(manifest.into_reader())
    }

    /// Builds the client payload for a bundle.
    pub fn json_response(&self, bundle: &Bundle) -> AppResult<BundleResponse> {
        bundle.to_response(&self.urls)
    }
}

/// Reject uploads whose display name contradicts the declared platform.
///
/// File extension and platform are a bijection; a mismatch means the
/// caller attached the wrong binary.
fn validate_display_name(new: &NewBundle) -> AppResult<()> {
    let Some(name) = new.display_name.as_deref() else {
        return Ok(());
    };

    let expected = new.platform.extension();
    if name.to_lowercase().ends_with(expected.as_str()) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "File '{name}' does not match platform {} (expected '{expected}')",
            new.platform
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use bundlehub_core::error::ErrorKind;
    use bundlehub_entity::bundle::info::BundleInfo;
    use bundlehub_entity::bundle::platform::Platform;

    /// In-memory bundle store recording delete calls into a shared log.
    #[derive(Debug, Default)]
    struct MemoryBundleStore {
        bundles: Mutex<HashMap<i64, Bundle>>,
        fail_delete: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl BundleStore for MemoryBundleStore {
        async fn create(&self, data: NewBundle) -> AppResult<Bundle> {
            let insert = data.into_insert(Utc::now());
            let mut bundles = self.bundles.lock().unwrap();
            let id = bundles.len() as i64 + 1;
            let bundle = Bundle {
                id,
                app_id: insert.app_id,
                file_id: insert.file_id,
                platform: insert.platform,
                version: insert.version,
                revision: insert.revision,
                description: insert.description,
                created_at: insert.created_at,
                updated_at: insert.updated_at,
            };
            bundles.insert(id, bundle.clone());
            Ok(bundle)
        }

        async fn find_by_id(&self, id: i64) -> AppResult<Option<Bundle>> {
            Ok(self.bundles.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_file_id(&self, file_id: &str) -> AppResult<Bundle> {
            self.bundles
                .lock()
                .unwrap()
                .values()
                .find(|b| b.file_id == file_id)
                .cloned()
                .ok_or_else(|| AppError::not_found(format!("No bundle with file id '{file_id}'")))
        }

        async fn find_by_app(&self, app_id: i64) -> AppResult<Vec<Bundle>> {
            Ok(self
                .bundles
                .lock()
                .unwrap()
                .values()
                .filter(|b| b.app_id == app_id)
                .cloned()
                .collect())
        }

        async fn next_revision(&self, app_id: i64, platform: Platform) -> AppResult<i32> {
            let max = self
                .bundles
                .lock()
                .unwrap()
                .values()
                .filter(|b| b.app_id == app_id && b.platform == platform)
                .map(|b| b.revision)
                .max()
                .unwrap_or(0);
            Ok(max + 1)
        }

        async fn update(&self, id: i64, changes: &UpdateBundle) -> AppResult<Bundle> {
            let mut bundles = self.bundles.lock().unwrap();
            let bundle = bundles
                .get_mut(&id)
                .ok_or_else(|| AppError::not_found(format!("Bundle {id} not found")))?;
            bundle.apply_update(changes, Utc::now());
            Ok(bundle.clone())
        }

        async fn delete(&self, id: i64) -> AppResult<bool> {
            self.log.lock().unwrap().push("row_delete");
            if self.fail_delete {
                return Err(AppError::database("row delete refused"));
            }
            Ok(self.bundles.lock().unwrap().remove(&id).is_some())
        }
    }

    #[derive(Debug, Default)]
    struct MemoryAppStore {
        apps: Mutex<HashMap<i64, App>>,
    }

    #[async_trait]
    impl AppStore for MemoryAppStore {
        async fn find_by_id(&self, id: i64) -> AppResult<Option<App>> {
            Ok(self.apps.lock().unwrap().get(&id).cloned())
        }
    }

    /// Remote store recording delete calls, optionally refusing them.
    #[derive(Debug)]
    struct MemoryRemoteStore {
        fail_delete: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl RemoteFileStore for MemoryRemoteStore {
        fn provider_type(&self) -> &str {
            "memory"
        }

        async fn upload(&self, _name: &str, _mime: &str, _data: Bytes) -> AppResult<String> {
            Ok("mem-file".to_string())
        }

        async fn download(&self, _file_id: &str) -> AppResult<Bytes> {
            Ok(Bytes::new())
        }

        async fn delete(&self, _file_id: &str) -> AppResult<()> {
            self.log.lock().unwrap().push("remote_delete");
            if self.fail_delete {
                return Err(AppError::external_service("remote delete refused"));
            }
            Ok(())
        }
    }

    struct Fixture {
        service: BundleService,
        bundles: Arc<MemoryBundleStore>,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    fn fixture(fail_row_delete: bool, fail_remote_delete: bool) -> Fixture {
        let log = Arc::new(Mutex::new(Vec::new()));
        let bundles = Arc::new(MemoryBundleStore {
            fail_delete: fail_row_delete,
            log: log.clone(),
            ..MemoryBundleStore::default()
        });
        let apps = Arc::new(MemoryAppStore::default());
        let store = Arc::new(MemoryRemoteStore {
            fail_delete: fail_remote_delete,
            log: log.clone(),
        });
        let urls = UrlBuilder::new("http://localhost:8080/").unwrap();

        Fixture {
            service: BundleService::new(bundles.clone(), apps, store, urls),
            bundles,
            log,
        }
    }

    fn seed_bundle(bundles: &MemoryBundleStore) -> Bundle {
        let bundle = Bundle {
            id: 1,
            app_id: 7,
            file_id: "drive-abc".to_string(),
            platform: Platform::Android,
            version: "2.0".to_string(),
            revision: 5,
            description: String::new(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        };
        bundles
            .bundles
            .lock()
            .unwrap()
            .insert(bundle.id, bundle.clone());
        bundle
    }

    fn new_bundle(platform: Platform, display_name: Option<&str>) -> NewBundle {
        NewBundle {
            app_id: 1,
            platform,
            file_id: "drive-abc".to_string(),
            revision: 1,
            description: String::new(),
            info: BundleInfo::with_version("1.0"),
            display_name: display_name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_row_before_remote_file() {
        let fx = fixture(false, false);
        seed_bundle(&fx.bundles);

        fx.service.delete_bundle(1).await.unwrap();

        assert_eq!(*fx.log.lock().unwrap(), vec!["row_delete", "remote_delete"]);
        assert!(fx.bundles.bundles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_remote_delete_still_leaves_row_deleted() {
        let fx = fixture(false, true);
        seed_bundle(&fx.bundles);

        let err = fx.service.delete_bundle(1).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert_eq!(*fx.log.lock().unwrap(), vec!["row_delete", "remote_delete"]);
        assert!(fx.bundles.bundles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_row_delete_leaves_remote_file_untouched() {
        let fx = fixture(true, false);
        seed_bundle(&fx.bundles);

        let err = fx.service.delete_bundle(1).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(*fx.log.lock().unwrap(), vec!["row_delete"]);
    }

    #[tokio::test]
    async fn test_unknown_file_id_is_not_found() {
        let fx = fixture(false, false);
        seed_bundle(&fx.bundles);

        let err = fx.service.get_bundle_by_file_id("ghost").await.unwrap_err();
        assert!(err.is_not_found());

        let found = fx.service.get_bundle_by_file_id("drive-abc").await.unwrap();
        assert_eq!(found.id, 1);
    }

    #[tokio::test]
    async fn test_install_manifest_requires_owning_app() {
        let fx = fixture(false, false);
        let bundle = seed_bundle(&fx.bundles);
        let ipa_url = Url::parse("https://dist.example.com/bundle/1/file.ipa").unwrap();

        let err = fx
            .service
            .install_manifest(&bundle, &ipa_url)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_name_must_match_platform() {
        assert!(validate_display_name(&new_bundle(Platform::Android, Some("app.apk"))).is_ok());
        assert!(validate_display_name(&new_bundle(Platform::Ios, Some("App.IPA"))).is_ok());
        assert!(validate_display_name(&new_bundle(Platform::Android, Some("app.ipa"))).is_err());
        assert!(validate_display_name(&new_bundle(Platform::Ios, Some("app.zip"))).is_err());
    }

    #[test]
    fn test_missing_display_name_is_accepted() {
        assert!(validate_display_name(&new_bundle(Platform::Android, None)).is_ok());
    }
}
