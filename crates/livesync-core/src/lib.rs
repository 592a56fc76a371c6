//! LiveSync Core Library
//!
//! Record models and the validated read/write operations behind the REST
//! layer, for both datasets: the flat to-do `items` list and the
//! classes/courses `catalog`.

pub mod catalog;
pub mod error;
pub mod items;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{LiveSyncError, LiveSyncResult};
