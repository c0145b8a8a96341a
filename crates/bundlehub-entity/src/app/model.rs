//! Application entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An application registered with BundleHub. Bundles hang off an app by
/// foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct App {
    /// Unique application identifier, assigned by the database.
    pub id: i64,
    /// Display title, shown in install prompts.
    pub title: String,
    /// Token clients present when uploading bundles for this app.
    pub api_token: String,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a new application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApp {
    /// Display title.
    pub title: String,
    /// Upload token.
    pub api_token: String,
}
