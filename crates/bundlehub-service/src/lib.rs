//! # bundlehub-service
//!
//! Service layer for BundleHub. Composes repositories, the remote file
//! store, and the link builder into the operations the HTTP front end
//! calls.

pub mod bundle;

pub use bundle::BundleService;
