//! Bundle repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use bundlehub_core::error::{AppError, ErrorKind};
use bundlehub_core::result::AppResult;
use bundlehub_entity::bundle::model::{Bundle, NewBundle, UpdateBundle};
use bundlehub_entity::bundle::platform::Platform;

use super::BundleStore;

/// sqlx-backed repository for bundle CRUD and query operations.
#[derive(Debug, Clone)]
pub struct BundleRepository {
    pool: PgPool,
}

impl BundleRepository {
    /// Create a new bundle repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BundleStore for BundleRepository {
    /// Insert a new bundle row.
    ///
    /// The persisted version is copied from the parsed binary metadata and
    /// both timestamps are stamped here, not by the caller.
    async fn create(&self, data: NewBundle) -> AppResult<Bundle> {
        let insert = data.into_insert(Utc::now());

        sqlx::query_as::<_, Bundle>(
            "INSERT INTO bundles (app_id, file_id, platform_type, bundle_version, revision, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(insert.app_id)
        .bind(&insert.file_id)
        .bind(insert.platform)
        .bind(&insert.version)
        .bind(insert.revision)
        .bind(&insert.description)
        .bind(insert.created_at)
        .bind(insert.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("bundles_file_id_key") =>
            {
                AppError::conflict(format!(
                    "A bundle with file id '{}' already exists",
                    insert.file_id
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create bundle", e),
        })
    }

    /// Find a bundle by ID.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Bundle>> {
        sqlx::query_as::<_, Bundle>("SELECT * FROM bundles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find bundle", e))
    }

    /// Find the bundle holding the given remote-store file id.
    ///
    /// `file_id` carries a unique index, so at most one row can match.
    async fn find_by_file_id(&self, file_id: &str) -> AppResult<Bundle> {
        let found = sqlx::query_as::<_, Bundle>("SELECT * FROM bundles WHERE file_id = $1")
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find bundle by file id", e)
            })?;

        require_file_id_match(found, file_id)
    }

    /// List all bundles of an app, newest revision first.
    async fn find_by_app(&self, app_id: i64) -> AppResult<Vec<Bundle>> {
        sqlx::query_as::<_, Bundle>(
            "SELECT * FROM bundles WHERE app_id = $1 ORDER BY revision DESC, id DESC",
        )
        .bind(app_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bundles", e))
    }

    /// The next build counter for an app/platform pair.
    async fn next_revision(&self, app_id: i64, platform: Platform) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(revision), 0) + 1 FROM bundles WHERE app_id = $1 AND platform_type = $2",
        )
        .bind(app_id)
        .bind(platform)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute next revision", e)
        })
    }

    /// Update a bundle's writable fields.
    ///
    /// Loads the current row, applies the changes in memory (description
    /// always, file id only when non-empty), and writes only those columns
    /// back. Everything else stays immutable after insert.
    async fn update(&self, id: i64, changes: &UpdateBundle) -> AppResult<Bundle> {
        let mut current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Bundle {id} not found")))?;

        current.apply_update(changes, Utc::now());

        sqlx::query_as::<_, Bundle>(
            "UPDATE bundles SET file_id = $2, description = $3, updated_at = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(current.id)
        .bind(&current.file_id)
        .bind(&current.description)
        .bind(current.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update bundle", e))?
        .ok_or_else(|| AppError::not_found(format!("Bundle {id} not found")))
    }

    /// Delete a bundle row.
    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bundles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete bundle", e)
            })?;

        debug!(bundle_id = id, deleted = result.rows_affected() > 0, "Deleted bundle row");
        Ok(result.rows_affected() > 0)
    }
}

/// Contract of file-id lookups: an absent row is an error, never a default.
fn require_file_id_match(found: Option<Bundle>, file_id: &str) -> AppResult<Bundle> {
    found.ok_or_else(|| AppError::not_found(format!("No bundle with file id '{file_id}'")))
}
