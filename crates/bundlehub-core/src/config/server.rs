//! Public server configuration.

use serde::{Deserialize, Serialize};

/// Public-facing server configuration.
///
/// BundleHub itself does not bind a socket in this layer; the base URL is
/// what install and QR-code links are resolved against, so it must match
/// whatever host the HTTP front end is reachable at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Public base URL, e.g. `https://bundles.example.com/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/".to_string()
}
