//! Remote file store implementations.

pub mod drive;

pub use drive::GoogleDriveStore;
