//! Public link building.

use url::Url;

use crate::error::AppError;
use crate::result::AppResult;

/// Resolves service-relative paths against the public base URL.
///
/// Install links and QR-code links embedded in responses must be absolute,
/// so every link goes through this builder instead of string concatenation.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: Url,
}

impl UrlBuilder {
    /// Create a builder from the configured public base URL.
    ///
    /// A trailing slash is enforced so that joining appends path segments
    /// instead of replacing the last one.
    pub fn new(base_url: &str) -> AppResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized)
            .map_err(|e| AppError::validation(format!("Invalid base URL '{base_url}': {e}")))?;
        Ok(Self { base })
    }

    /// Resolve a service-relative path to an absolute URL.
    pub fn url_for(&self, path: &str) -> AppResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::validation(format!("Invalid link path '{path}': {e}")))
    }

    /// The configured base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }
}
