use club_telemetry::logging::DiagnosticCounter;
use club_telemetry::storage::SledLogStore;
use club_telemetry::{EventLog, LogLevel, TelemetryConfig};
use serde_json::json;
use std::sync::Arc;

fn config(max_entries: usize) -> TelemetryConfig {
    TelemetryConfig::default()
        .with_max_entries(max_entries)
        .with_dev_build(false)
}

#[test]
fn log_survives_a_restart_on_sled() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("db");

    let before = {
        let db = sled::open(&db_path).unwrap();
        let log = EventLog::new(&config(100), Arc::new(SledLogStore::new(&db).unwrap()));
        log.record(LogLevel::Info, "Home page loaded", None);
        log.record(
            LogLevel::Success,
            "Profile saved",
            Some(json!({ "volunteer": 12 })),
        );
        log.record(LogLevel::Error, "SERVER error in announcements", None);
        log.query(None)
    };

    let db = sled::open(&db_path).unwrap();
    let counter = Arc::new(DiagnosticCounter::new());
    let log = EventLog::with_diagnostics(
        &config(100),
        Arc::new(SledLogStore::new(&db).unwrap()),
        counter.clone(),
    );

    assert_eq!(log.query(None), before);
    assert_eq!(counter.total(), 0);
}

#[test]
fn restart_with_smaller_capacity_keeps_the_newest() {
    let db = sled::Config::new().temporary(true).open().unwrap();
    {
        let log = EventLog::new(&config(10), Arc::new(SledLogStore::new(&db).unwrap()));
        for i in 0..10 {
            log.record(LogLevel::Info, format!("event {}", i), None);
        }
    }

    let log = EventLog::new(&config(4), Arc::new(SledLogStore::new(&db).unwrap()));
    let messages: Vec<_> = log.query(None).into_iter().map(|e| e.message).collect();
    assert_eq!(messages, vec!["event 6", "event 7", "event 8", "event 9"]);
}

#[test]
fn cleared_log_stays_empty_after_restart() {
    let db = sled::Config::new().temporary(true).open().unwrap();
    {
        let log = EventLog::new(&config(10), Arc::new(SledLogStore::new(&db).unwrap()));
        log.record(LogLevel::Warn, "Slow response", None);
        log.clear();
    }

    let log = EventLog::new(&config(10), Arc::new(SledLogStore::new(&db).unwrap()));
    assert!(log.is_empty());
}

#[test]
fn export_writes_a_dated_file() {
    let tmp = tempfile::tempdir().unwrap();
    let db = sled::Config::new().temporary(true).open().unwrap();
    let log = EventLog::new(&config(10), Arc::new(SledLogStore::new(&db).unwrap()));
    log.record(LogLevel::Info, "Announcements listed", None);

    let path = log.export_to(tmp.path()).unwrap();

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("app_logs_"));
    assert!(name.ends_with(".json"));
    assert_eq!(name.len(), "app_logs_YYYY-MM-DD.json".len());

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, log.export().unwrap());
    assert_eq!(log.len(), 1);
}
