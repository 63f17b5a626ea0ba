//! Writing exported log snapshots to disk.
use crate::error::TelemetryResult;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// The file name an export taken on `date` is saved under.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("app_logs_{}.json", date.format("%Y-%m-%d"))
}

/// Saves `contents` as `app_logs_<date>.json` inside `dir`, creating `dir`
/// if needed. An export from the same day replaces the earlier file.
pub fn save_export(dir: &Path, contents: &str, date: NaiveDate) -> TelemetryResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(date));
    std::fs::write(&path, contents)?;
    info!("Exported logs to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_has_date_only() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "app_logs_2024-03-07.json");
    }

    #[test]
    fn save_creates_the_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("exports");
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

        let path = save_export(&dir, "[]", date).unwrap();

        assert_eq!(path, dir.join("app_logs_2024-03-07.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }
}
