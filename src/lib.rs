//! Client-side observability for the club website: a bounded, persisted
//! event log and the failure classifier that routes backend errors to a
//! user-facing message and a recovery action.
pub mod classify;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod notify;
pub mod storage;
pub mod telemetry;
pub mod types;

pub use classify::{ClassificationResult, Failure, FailureClassifier, FieldError, ValidationErrors};
pub use config::TelemetryConfig;
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{EventLog, EventLogLayer};
pub use telemetry::{Telemetry, TelemetryChannels};
pub use types::{ErrorCategory, LogEntry, LogLevel, Origin};
