//! This module handles the initial setup of the application.
use super::args::AppArgs;
use anyhow::Result;
use club_telemetry::config::resolve_dev_build;
use club_telemetry::storage::{LogStore, MemoryLogStore, SledLogStore};
use club_telemetry::{Telemetry, TelemetryChannels, TelemetryConfig};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Contains all the necessary components for a command to run.
pub struct PreparedApp {
    /// The command-line arguments.
    pub args: AppArgs,
    pub config: TelemetryConfig,
    pub telemetry: Telemetry,
    pub channels: TelemetryChannels,
}

/// Prepares the application for running.
///
/// This function performs the following steps:
/// 1. Resolves the configuration.
/// 2. Configures logging.
/// 3. Opens the log store (sled, or memory with `--ephemeral`).
/// 4. Builds the event log and the classifier.
///
/// # Errors
///
/// This function will return an error if the data directory or the
/// database cannot be opened.
pub fn prepare(args: AppArgs) -> Result<PreparedApp> {
    let config = TelemetryConfig::default()
        .with_max_entries(args.max_entries)
        .with_dev_build(resolve_dev_build(args.dev))
        .with_location(args.location.clone());

    configure_logging(config.dev_build);

    let store: Arc<dyn LogStore + Send + Sync> = if args.ephemeral {
        debug!("Using in-memory log store");
        Arc::new(MemoryLogStore::new())
    } else {
        std::fs::create_dir_all(&args.data_dir)?;
        let db_path = format!("{}/db", args.data_dir);
        let db = sled::open(&db_path)?;
        debug!("Opened log store at {}", db_path);
        Arc::new(SledLogStore::new(&db)?)
    };

    let (telemetry, channels) = Telemetry::build(&config, store);

    Ok(PreparedApp {
        args,
        config,
        telemetry,
        channels,
    })
}

/// Configures logging for the application.
///
/// `RUST_LOG` wins; otherwise development builds get debug output for this
/// crate and release builds only warnings.
fn configure_logging(dev_build: bool) {
    let default_filter = if dev_build {
        "info,club_telemetry=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
