//! The main entry point for the club-telemetry admin tool.
mod app;

use anyhow::Result;

/// The main function of the application.
///
/// Parses the command line, opens the log store and runs the requested
/// command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the command fails.
#[tokio::main]
async fn main() -> Result<()> {
    app::launch().await
}
