//! Execution of the admin commands.
use super::args::Command;
use super::setup::PreparedApp;
use anyhow::{Context, Result};
use club_telemetry::{Failure, LogEntry};
use std::time::Duration;

pub async fn run(app: PreparedApp) -> Result<()> {
    let PreparedApp {
        args,
        config,
        telemetry,
        mut channels,
    } = app;
    let log = &telemetry.log;

    match args.command {
        Command::Show { level } => {
            let entries = log.query(level);
            for entry in &entries {
                println!("{}", format_entry(entry));
            }
            println!();
            let summary = log
                .summary()
                .into_iter()
                .map(|(level, count)| format!("{}={}", level, count))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{} of {} entries shown ({})", entries.len(), log.len(), summary);
        }
        Command::Record {
            level,
            message,
            data,
        } => {
            let data = data
                .map(|raw| serde_json::from_str(&raw))
                .transpose()
                .context("--data must be valid JSON")?;
            log.record(level, message, data);
            println!("📝 {} entries in log", log.len());
        }
        Command::Clear => {
            log.clear();
            println!("🧹 Log cleared");
        }
        Command::Export { dir } => {
            let path = log.export_to(&dir)?;
            println!("📦 Exported {} entries to {}", log.len(), path.display());
        }
        Command::Classify {
            status,
            code,
            offline,
            message,
            method,
            url,
            context,
        } => {
            telemetry.connectivity.set_online(!offline);

            let mut failure = Failure::new(message);
            failure.status = status;
            failure.code = code;
            failure.method = method;
            failure.url = url;

            let result = telemetry.classifier.classify_and_handle(failure, &context);
            println!("Category: {}", result.category);
            println!("Message:  {}", result.message);

            while let Ok(notification) = channels.notifications.try_recv() {
                println!("Notify [{:?}]: {}", notification.severity, notification.message);
            }

            if let Some(ticket) = result.navigation {
                println!(
                    "Navigation {} to {} in {:?}",
                    ticket, config.login_path, config.auth_redirect_delay
                );
                let wait = config.auth_redirect_delay + Duration::from_secs(1);
                if let Ok(Some(path)) = tokio::time::timeout(wait, channels.navigations.recv()).await {
                    println!("➡️  Navigated to {}", path);
                }
            }
        }
    }

    Ok(())
}

fn format_entry(entry: &LogEntry) -> String {
    let mut line = format!(
        "{} [{:<7}] {} ({})",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.level,
        entry.message,
        entry.origin.location
    );
    if let Some(data) = &entry.data {
        line.push(' ');
        line.push_str(&data.to_string());
    }
    line
}
