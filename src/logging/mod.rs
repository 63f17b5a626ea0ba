//! This module contains the logging infrastructure for the application.
//!
//! It includes the bounded, persisted `EventLog`, a `tracing` layer that
//! mirrors application events into it, and the diagnostic side channel for
//! failures the log handles internally.
pub mod collector;
pub mod diagnostics;
pub mod event_log;
pub mod export;

pub use collector::EventLogLayer;
pub use diagnostics::{
    Diagnostic, DiagnosticCounter, DiagnosticKind, DiagnosticSink, TracingDiagnostics,
};
pub use event_log::EventLog;
