//! # bundlehub-core
//!
//! Core crate for BundleHub. Contains the remote-store trait,
//! configuration schemas, link building, the logging bootstrap, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other BundleHub crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
