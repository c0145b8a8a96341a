//! Bundle lifecycle operations.

pub mod service;

pub use service::BundleService;
