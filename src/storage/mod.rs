//! This module defines the durable key-value storage the event log mirrors
//! itself into, with a `sled` implementation and an in-memory one.
pub mod memory;
pub mod sled_store;

pub use memory::MemoryLogStore;
pub use sled_store::SledLogStore;

use crate::error::TelemetryResult;

/// The key the event log persists its full sequence under.
pub const LOG_STORAGE_KEY: &str = "app_logs";

/// A trait for a key-value store holding serialized log state.
pub trait LogStore {
    /// Loads the bytes stored under `key`.
    ///
    /// # Returns
    ///
    /// `None` if nothing has been stored under `key`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the store cannot be read.
    fn load(&self, key: &str) -> TelemetryResult<Option<Vec<u8>>>;

    /// Replaces the value under `key` with `value`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the value cannot be written.
    fn save(&self, key: &str, value: &[u8]) -> TelemetryResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// This function will return an error if the store cannot be written.
    fn remove(&self, key: &str) -> TelemetryResult<()>;
}
