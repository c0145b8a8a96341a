//! Shared value types.

pub mod url;

pub use url::UrlBuilder;
