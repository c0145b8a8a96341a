//! Repository implementations for all BundleHub entities.
//!
//! The service layer consumes repositories through the [`BundleStore`]
//! and [`AppStore`] traits so it can be exercised against in-memory
//! stores; the concrete sqlx-backed implementations live in the
//! sub-modules here.

use async_trait::async_trait;

use bundlehub_core::result::AppResult;
use bundlehub_entity::app::model::App;
use bundlehub_entity::bundle::model::{Bundle, NewBundle, UpdateBundle};
use bundlehub_entity::bundle::platform::Platform;

pub mod app;
pub mod bundle;

pub use app::AppRepository;
pub use bundle::BundleRepository;

/// Persistence seam for bundles.
#[async_trait]
pub trait BundleStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new bundle row. Implementations copy the persisted version
    /// from the parsed binary metadata and stamp both timestamps.
    async fn create(&self, data: NewBundle) -> AppResult<Bundle>;

    /// Find a bundle by ID.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Bundle>>;

    /// Find the bundle holding the given remote-store file id. An absent
    /// row is a `NotFound` error, never a silent default.
    async fn find_by_file_id(&self, file_id: &str) -> AppResult<Bundle>;

    /// List all bundles of an app, newest revision first.
    async fn find_by_app(&self, app_id: i64) -> AppResult<Vec<Bundle>>;

    /// The next build counter for an app/platform pair.
    async fn next_revision(&self, app_id: i64, platform: Platform) -> AppResult<i32>;

    /// Update a bundle's writable fields.
    async fn update(&self, id: i64, changes: &UpdateBundle) -> AppResult<Bundle>;

    /// Delete a bundle row. Returns `true` if a row was deleted.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// Lookup seam for applications.
#[async_trait]
pub trait AppStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find an application by ID.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<App>>;
}
