//! # bundlehub-storage
//!
//! Remote file store implementations for BundleHub. Uploaded application
//! binaries live in Google Drive; database rows only hold the opaque file
//! id Drive assigned.

pub mod providers;

pub use providers::GoogleDriveStore;
