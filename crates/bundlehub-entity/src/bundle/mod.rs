//! Bundle domain entities.
//!
//! A bundle is one uploaded application binary (Android `.apk` or iOS
//! `.ipa`) belonging to an [`crate::app::App`].

pub mod info;
pub mod manifest;
pub mod model;
pub mod platform;
pub mod response;

pub use info::BundleInfo;
pub use manifest::InstallManifest;
pub use model::{Bundle, BundleInsert, NewBundle, UpdateBundle};
pub use platform::{FileExtension, Platform};
pub use response::BundleResponse;
