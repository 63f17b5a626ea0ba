//! This module provides the bounded, persisted event log.
//!
//! The `EventLog` keeps the most recent entries in a ring buffer and mirrors
//! the whole sequence into a `LogStore` after every write, so a restart can
//! pick up where the previous session stopped.
use super::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingDiagnostics};
use super::export;
use crate::config::TelemetryConfig;
use crate::error::{TelemetryError, TelemetryResult};
use crate::storage::LogStore;
use crate::types::{LogEntry, LogLevel, Origin};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::debug;

/// A bounded record of application events mirrored into durable storage.
pub struct EventLog {
    /// The circular buffer of log entries. The guard also serializes writes
    /// to the store so memory and storage stay consistent.
    entries: Mutex<VecDeque<LogEntry>>,
    /// The maximum number of entries to store in the buffer.
    max_size: usize,
    /// Whether DEBUG entries are recorded.
    dev_build: bool,
    storage_key: String,
    store: Arc<dyn LogStore + Send + Sync>,
    diagnostics: Arc<dyn DiagnosticSink + Send + Sync>,
    location: RwLock<String>,
    client: String,
}

impl EventLog {
    /// Creates a new `EventLog` and rehydrates it from `store`.
    ///
    /// Swallowed storage failures are reported as `tracing` warnings.
    pub fn new(config: &TelemetryConfig, store: Arc<dyn LogStore + Send + Sync>) -> Self {
        Self::with_diagnostics(config, store, Arc::new(TracingDiagnostics))
    }

    /// Creates a new `EventLog` reporting swallowed failures to `diagnostics`.
    ///
    /// # Arguments
    ///
    /// * `config` - Capacity, storage key, development flag and origin.
    /// * `store` - The durable store the log is mirrored into.
    /// * `diagnostics` - Receives every failure the log handles internally.
    pub fn with_diagnostics(
        config: &TelemetryConfig,
        store: Arc<dyn LogStore + Send + Sync>,
        diagnostics: Arc<dyn DiagnosticSink + Send + Sync>,
    ) -> Self {
        let log = Self {
            entries: Mutex::new(VecDeque::with_capacity(config.max_entries.min(4096))),
            max_size: config.max_entries,
            dev_build: config.dev_build,
            storage_key: config.storage_key.clone(),
            store,
            diagnostics,
            location: RwLock::new(config.location.clone()),
            client: config.client.clone(),
        };
        log.rehydrate();
        log
    }

    /// Appends a new entry and mirrors the full sequence to storage.
    ///
    /// DEBUG entries are dropped unless the log was built with the
    /// development flag. Storage failures are reported to the diagnostic
    /// hook; the entry stays in memory either way.
    pub fn record(&self, level: LogLevel, message: impl Into<String>, data: Option<Value>) {
        if level == LogLevel::Debug && !self.dev_build {
            return;
        }

        let message = message.into();
        if message.trim().is_empty() {
            self.report(DiagnosticKind::EmptyMessage, format!("{} entry without a message dropped", level));
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message,
            data,
            origin: self.origin(),
        };

        let mut entries = self.lock_entries();
        entries.push_back(entry);
        while entries.len() > self.max_size {
            entries.pop_front();
        }
        self.persist(&entries);
    }

    /// Records an entry whose payload is any serializable value.
    ///
    /// A payload that cannot be serialized is dropped; the entry is still
    /// recorded without data.
    pub fn record_serialized<T>(&self, level: LogLevel, message: impl Into<String>, data: &T)
    where
        T: Serialize + ?Sized,
    {
        let data = match serde_json::to_value(data) {
            Ok(value) => Some(value),
            Err(e) => {
                self.report(DiagnosticKind::PayloadDropped, format!("payload not serializable: {}", e));
                None
            }
        };
        self.record(level, message, data);
    }

    /// Returns the entries at `level`, or all entries, in insertion order.
    pub fn query(&self, level: Option<LogLevel>) -> Vec<LogEntry> {
        self.lock_entries()
            .iter()
            .filter(|entry| level.map_or(true, |l| entry.level == l))
            .cloned()
            .collect()
    }

    /// Empties the log and removes its persisted state.
    pub fn clear(&self) {
        let mut entries = self.lock_entries();
        entries.clear();
        if let Err(e) = self.store.remove(&self.storage_key) {
            self.report(DiagnosticKind::ClearFailed, format!("failed to clear persisted logs: {}", e));
        }
    }

    /// Serializes the full sequence as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// This function will return an error if the entries cannot be serialized.
    pub fn export(&self) -> TelemetryResult<String> {
        let entries = self.lock_entries();
        Ok(serde_json::to_string_pretty(&*entries)?)
    }

    /// Writes the exported sequence to `app_logs_<date>.json` inside `dir`.
    ///
    /// # Returns
    ///
    /// The path of the written file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the entries cannot be serialized
    /// or the file cannot be written.
    pub fn export_to(&self, dir: &Path) -> TelemetryResult<PathBuf> {
        let contents = self.export()?;
        export::save_export(dir, &contents, Utc::now().date_naive())
    }

    /// Replaces the in-memory sequence with the persisted one.
    ///
    /// Called by the constructors. A missing key leaves the log as it is; a
    /// read or parse failure is reported and otherwise ignored.
    ///
    /// # Returns
    ///
    /// `true` if persisted state was applied.
    pub fn rehydrate(&self) -> bool {
        let bytes = match self.store.load(&self.storage_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return false,
            Err(e) => {
                self.report(DiagnosticKind::RehydrateFailed, format!("failed to read persisted logs: {}", e));
                return false;
            }
        };

        let mut restored: Vec<LogEntry> = match serde_json::from_slice(&bytes) {
            Ok(restored) => restored,
            Err(e) => {
                self.report(DiagnosticKind::RehydrateFailed, format!("persisted logs are corrupt: {}", e));
                return false;
            }
        };

        if restored.len() > self.max_size {
            restored.drain(..restored.len() - self.max_size);
        }
        debug!("Rehydrated {} log entries", restored.len());
        *self.lock_entries() = restored.into();
        true
    }

    /// Updates the location captured in the origin of later entries.
    pub fn set_location(&self, location: impl Into<String>) {
        *self.location.write().unwrap_or_else(PoisonError::into_inner) = location.into();
    }

    /// Returns the number of entries per level, in `LogLevel::ALL` order.
    pub fn summary(&self) -> Vec<(LogLevel, usize)> {
        let entries = self.lock_entries();
        LogLevel::ALL
            .into_iter()
            .map(|level| (level, entries.iter().filter(|e| e.level == level).count()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn dev_build(&self) -> bool {
        self.dev_build
    }

    fn origin(&self) -> Origin {
        Origin {
            location: self
                .location
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            client: self.client.clone(),
        }
    }

    fn persist(&self, entries: &VecDeque<LogEntry>) {
        let result = serde_json::to_vec(entries)
            .map_err(TelemetryError::from)
            .and_then(|bytes| self.store.save(&self.storage_key, &bytes));
        if let Err(e) = result {
            self.report(DiagnosticKind::PersistFailed, format!("failed to persist logs: {}", e));
        }
    }

    fn report(&self, kind: DiagnosticKind, detail: String) {
        self.diagnostics.report(Diagnostic::new(kind, detail));
    }

    fn lock_entries(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
