//! Application domain entities.

pub mod model;

pub use model::{App, NewApp};
