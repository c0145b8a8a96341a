//! Application repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use bundlehub_core::error::{AppError, ErrorKind};
use bundlehub_core::result::AppResult;
use bundlehub_entity::app::model::{App, NewApp};

use super::AppStore;

/// sqlx-backed repository for application lookup and registration.
#[derive(Debug, Clone)]
pub struct AppRepository {
    pool: PgPool,
}

#[async_trait]
impl AppStore for AppRepository {
    /// Find an application by ID.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<App>> {
        sqlx::query_as::<_, App>("SELECT * FROM apps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find app", e))
    }
}

impl AppRepository {
    /// Create a new application repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an application by its upload token.
    pub async fn find_by_api_token(&self, api_token: &str) -> AppResult<Option<App>> {
        sqlx::query_as::<_, App>("SELECT * FROM apps WHERE api_token = $1")
            .bind(api_token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find app by token", e)
            })
    }

    /// Register a new application.
    pub async fn create(&self, data: &NewApp) -> AppResult<App> {
        sqlx::query_as::<_, App>(
            "INSERT INTO apps (title, api_token) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.api_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("apps_api_token_key") =>
            {
                AppError::conflict("An app with this API token already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create app", e),
        })
    }

    /// Delete an application (bundles cascade at the schema level).
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM apps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete app", e))?;
        Ok(result.rows_affected() > 0)
    }
}
