//! This module provides a `tracing` layer that mirrors application events
//! into the `EventLog`.
use super::EventLog;
use crate::types::LogLevel;
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

/// A `tracing` layer that records events into an `EventLog`.
///
/// Events whose target starts with one of the ignored prefixes are skipped.
/// By default that covers this crate's own targets, which keeps the log's
/// diagnostic warnings from being written back into the log.
pub struct EventLogLayer {
    log: Arc<EventLog>,
    ignored_targets: Vec<String>,
}

impl EventLogLayer {
    /// Creates a new `EventLogLayer`.
    ///
    /// # Arguments
    ///
    /// * `log` - The `EventLog` to which events will be recorded.
    pub fn new(log: Arc<EventLog>) -> Self {
        Self {
            log,
            ignored_targets: vec![env!("CARGO_CRATE_NAME").to_string()],
        }
    }

    /// Skips events whose target starts with `prefix`.
    pub fn ignore_target(mut self, prefix: impl Into<String>) -> Self {
        self.ignored_targets.push(prefix.into());
        self
    }

    fn is_ignored(&self, target: &str) -> bool {
        self.ignored_targets
            .iter()
            .any(|prefix| target.starts_with(prefix.as_str()))
    }
}

fn map_level(level: &Level) -> Option<LogLevel> {
    match *level {
        Level::ERROR => Some(LogLevel::Error),
        Level::WARN => Some(LogLevel::Warn),
        Level::INFO => Some(LogLevel::Info),
        Level::DEBUG => Some(LogLevel::Debug),
        Level::TRACE => None,
    }
}

impl<S> Layer<S> for EventLogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if self.is_ignored(metadata.target()) {
            return;
        }
        let Some(level) = map_level(metadata.level()) else {
            return;
        };

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let data = if visitor.fields.is_empty() {
            serde_json::json!({ "target": metadata.target() })
        } else {
            visitor.fields.insert("target".into(), metadata.target().into());
            serde_json::Value::Object(visitor.fields)
        };

        self.log.record(level, visitor.message, Some(data));
    }
}

/// Collects the `message` field and any other fields of an event.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{:?}", value).into());
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.into());
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields.insert(field.name().to_string(), value.into());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.insert(field.name().to_string(), value.into());
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.insert(field.name().to_string(), value.into());
    }
}
