//! Trait seams implemented by other BundleHub crates.

pub mod storage;

pub use storage::RemoteFileStore;
