//! Side channel for failures the event log swallows.
//!
//! Nothing reported here is ever recorded into the event log itself.
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// The `tracing` target diagnostics are emitted on.
pub const DIAGNOSTICS_TARGET: &str = "club_telemetry::diagnostics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    PersistFailed,
    RehydrateFailed,
    ClearFailed,
    PayloadDropped,
    EmptyMessage,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Receives failures that were handled without reaching the caller.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Emits diagnostics as `tracing` warnings on [`DIAGNOSTICS_TARGET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        warn!(
            target: DIAGNOSTICS_TARGET,
            kind = ?diagnostic.kind,
            "{}",
            diagnostic.detail
        );
    }
}

/// Counts diagnostics by kind.
#[derive(Debug, Default)]
pub struct DiagnosticCounter {
    counts: Mutex<HashMap<DiagnosticKind, usize>>,
    last: Mutex<Option<Diagnostic>>,
}

impl DiagnosticCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }

    pub fn last(&self) -> Option<Diagnostic> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for DiagnosticCounter {
    fn report(&self, diagnostic: Diagnostic) {
        *self
            .counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(diagnostic.kind)
            .or_insert(0) += 1;
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(diagnostic);
    }
}
