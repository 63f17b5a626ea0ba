//! An in-process `LogStore`, used for ephemeral runs and tests.
use super::LogStore;
use crate::error::{TelemetryError, TelemetryResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// A `LogStore` that keeps values in a map.
///
/// Reads and writes can be switched to fail so callers can exercise their
/// error paths.
#[derive(Default)]
pub struct MemoryLogStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `value` under `key`.
    pub fn with_value(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the raw value under `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl LogStore for MemoryLogStore {
    fn load(&self, key: &str) -> TelemetryResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(TelemetryError::Unavailable("reads disabled".into()));
        }
        Ok(self.raw(key))
    }

    fn save(&self, key: &str, value: &[u8]) -> TelemetryResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TelemetryError::Unavailable("writes disabled".into()));
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> TelemetryResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TelemetryError::Unavailable("writes disabled".into()));
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
