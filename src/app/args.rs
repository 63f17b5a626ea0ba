use clap::{Parser, Subcommand};
use club_telemetry::config::DEFAULT_MAX_ENTRIES;
use club_telemetry::LogLevel;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "club-telemetry")]
#[command(about = "Inspect and manage the club site's client event log")]
pub struct AppArgs {
    #[arg(long, default_value = "data", help = "Data directory")]
    pub data_dir: String,

    #[arg(long, help = "Record DEBUG entries (or set CLUB_TELEMETRY_DEV=1)")]
    pub dev: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES, help = "Maximum number of entries kept")]
    pub max_entries: usize,

    #[arg(long, help = "Keep the log in memory only")]
    pub ephemeral: bool,

    #[arg(long, default_value = "/admin/logs", help = "Location recorded on new entries")]
    pub location: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the recorded entries
    Show {
        #[arg(long, help = "Only entries at this level")]
        level: Option<LogLevel>,
    },
    /// Record a new entry
    Record {
        level: LogLevel,
        message: String,
        #[arg(long, help = "JSON payload")]
        data: Option<String>,
    },
    /// Remove every entry
    Clear,
    /// Save the log as app_logs_<date>.json
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Classify a failure and run its handling
    Classify {
        #[arg(long)]
        status: Option<u16>,
        #[arg(long, help = "Transport error code, e.g. ERR_NETWORK")]
        code: Option<String>,
        #[arg(long, help = "Treat the client as offline")]
        offline: bool,
        #[arg(long, default_value = "")]
        message: String,
        #[arg(long)]
        method: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        context: String,
    },
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }
}
