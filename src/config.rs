//! Runtime configuration for the event log and the failure classifier.
use crate::storage::LOG_STORAGE_KEY;
use std::time::Duration;

pub const DEFAULT_MAX_ENTRIES: usize = 1000;
pub const DEFAULT_LOGIN_PATH: &str = "/volunteer/login";
pub const DEFAULT_AUTH_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Environment variable that turns on the development build flag.
pub const DEV_ENV_VAR: &str = "CLUB_TELEMETRY_DEV";

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Maximum number of entries kept in memory and in storage.
    pub max_entries: usize,
    /// Storage key the full sequence is persisted under.
    pub storage_key: String,
    /// Whether DEBUG entries are recorded. Fixed once the log is built.
    pub dev_build: bool,
    /// Location recorded in the origin of new entries.
    pub location: String,
    /// Client signature recorded in the origin of new entries.
    pub client: String,
    /// Path the session is sent to after an AUTH failure.
    pub login_path: String,
    /// Delay before the AUTH redirect fires.
    pub auth_redirect_delay: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            storage_key: LOG_STORAGE_KEY.to_string(),
            dev_build: cfg!(debug_assertions),
            location: "/".to_string(),
            client: default_client_signature(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            auth_redirect_delay: DEFAULT_AUTH_REDIRECT_DELAY,
        }
    }
}

impl TelemetryConfig {
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_dev_build(mut self, dev_build: bool) -> Self {
        self.dev_build = dev_build;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// Resolves the development flag from an explicit switch or the environment.
pub fn resolve_dev_build(explicit: bool) -> bool {
    explicit
        || std::env::var(DEV_ENV_VAR)
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(cfg!(debug_assertions))
}

fn default_client_signature() -> String {
    format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
