use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};

use crate::detail;
use crate::models::{SessionSummary, SettingsModel};

const SUMMARY_LOG_FILE: &str = "SessionSummaries.csv";
const SETTINGS_FILE: &str = "settings.json";
const DETAIL_DIR: &str = "sessions";

/// File-backed store for session records: the summary log, per-session
/// detail files, and the settings document, all under one data directory.
pub struct SessionStore {
    data_dir: PathBuf,
}

impl SessionStore {
    /// Store rooted at the platform data directory.
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .context("could not determine platform data directory")?
            .join("focuswatch");
        Ok(Self { data_dir })
    }

    /// Store rooted at an explicit directory (tests, `--data-dir`).
    pub fn with_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn detail_dir(&self) -> PathBuf {
        self.data_dir.join(DETAIL_DIR)
    }

    fn summary_log_path(&self) -> PathBuf {
        self.data_dir.join(SUMMARY_LOG_FILE)
    }

    fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    /// Append one summary row to the log, creating it with the header line
    /// first if it does not exist yet. Single write per call; the log is
    /// append-only and never rewritten in place.
    pub fn append_summary(&self, summary: &SessionSummary) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create data dir {}", self.data_dir.display()))?;

        let path = self.summary_log_path();
        let mut chunk = String::new();
        if !path.exists() {
            chunk.push_str(SessionSummary::csv_header());
            chunk.push('\n');
        }
        chunk.push_str(&summary.to_csv_string());
        chunk.push('\n');

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("failed to open summary log {}", path.display()))?;
        file.write_all(chunk.as_bytes())
            .with_context(|| format!("failed to append to summary log {}", path.display()))?;

        Ok(())
    }

    /// Read every parseable row from the summary log. The header sentinel and
    /// malformed lines are skipped; a missing log is simply empty.
    pub fn load_summaries(&self) -> Result<Vec<SessionSummary>> {
        let path = self.summary_log_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read summary log {}", path.display()))?;

        let mut summaries = Vec::new();
        for line in contents.lines() {
            if line == SessionSummary::csv_header() {
                continue;
            }
            if let Some(summary) = SessionSummary::from_csv_string(line) {
                summaries.push(summary);
            }
        }

        Ok(summaries)
    }

    pub fn write_detail_file(
        &self,
        date: NaiveDate,
        start_time: NaiveTime,
        subject: &str,
        samples: &[(f64, f64)],
    ) -> Result<PathBuf> {
        let dir = self.detail_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create session data dir {}", dir.display()))?;
        detail::write_detail_file(&dir, date, start_time, subject, samples)
    }

    /// Bulk-import summaries from an external headered CSV file. Unlike the
    /// tolerant log loader, import is strict: the first malformed row aborts
    /// with an error and nothing after it is ingested.
    pub fn import_summaries(&self, csv_path: &Path) -> Result<usize> {
        #[derive(serde::Deserialize)]
        struct CsvRow {
            #[serde(rename = "Date")]
            date: NaiveDate,
            #[serde(rename = "StartTime")]
            start_time: NaiveTime,
            #[serde(rename = "Subject")]
            subject: String,
            #[serde(rename = "SessionDurationMinutes")]
            session_duration_minutes: u32,
            #[serde(rename = "TotalAlertCount")]
            total_alert_count: u32,
        }

        let mut reader = csv::Reader::from_path(csv_path)
            .with_context(|| format!("failed to open import file {}", csv_path.display()))?;
        let mut inserted = 0usize;

        for result in reader.deserialize::<CsvRow>() {
            let row = result?;
            self.append_summary(&SessionSummary {
                date: row.date,
                start_time: row.start_time,
                subject: row.subject,
                session_duration_minutes: row.session_duration_minutes,
                total_alert_count: row.total_alert_count,
            })?;
            inserted += 1;
        }

        Ok(inserted)
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// does not deserialize. Settings problems never block session work.
    pub fn load_settings(&self) -> Result<SettingsModel> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(SettingsModel::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Ok(serde_json::from_str(&contents).unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &SettingsModel) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create data dir {}", self.data_dir.display()))?;

        let serialized = serde_json::to_string_pretty(settings)?;
        fs::write(self.settings_path(), serialized)
            .with_context(|| format!("failed to write settings to {}", self.settings_path().display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_summary(subject: &str, day: u32) -> SessionSummary {
        SessionSummary {
            date: NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            subject: subject.to_string(),
            session_duration_minutes: 25,
            total_alert_count: 2,
        }
    }

    #[test]
    fn append_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());

        store.append_summary(&sample_summary("Math", 14)).unwrap();
        store.append_summary(&sample_summary("Science", 15)).unwrap();

        let contents = fs::read_to_string(dir.path().join(SUMMARY_LOG_FILE)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], SessionSummary::csv_header());
        assert_eq!(lines[1], "2025-10-14,09:30:00,Math,25,2");
        assert_eq!(lines[2], "2025-10-15,09:30:00,Science,25,2");
    }

    #[test]
    fn load_round_trips_appended_rows() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());
        let summary = sample_summary("Math", 14);

        store.append_summary(&summary).unwrap();

        let loaded = store.load_summaries().unwrap();
        assert_eq!(loaded, vec![summary]);
    }

    #[test]
    fn load_skips_header_and_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());
        let contents = format!(
            "{}\n2025-10-14,09:30:00,Math,25,2\ngarbage line\n2025-10-15,xx:30:00,Science,25,2\n",
            SessionSummary::csv_header()
        );
        fs::write(dir.path().join(SUMMARY_LOG_FILE), contents).unwrap();

        let loaded = store.load_summaries().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].subject, "Math");
    }

    #[test]
    fn missing_log_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());

        assert!(store.load_summaries().unwrap().is_empty());
    }

    #[test]
    fn import_appends_every_row() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());
        let import_path = dir.path().join("export.csv");
        fs::write(
            &import_path,
            "Date,StartTime,Subject,SessionDurationMinutes,TotalAlertCount\n\
             2025-10-14,09:30:00,Math,25,2\n\
             2025-10-15,14:15:00,Science,50,4\n",
        )
        .unwrap();

        let inserted = store.import_summaries(&import_path).unwrap();
        assert_eq!(inserted, 2);

        let loaded = store.load_summaries().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].subject, "Science");
        assert_eq!(loaded[1].session_duration_minutes, 50);
    }

    #[test]
    fn import_rejects_malformed_rows() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());
        let import_path = dir.path().join("export.csv");
        fs::write(
            &import_path,
            "Date,StartTime,Subject,SessionDurationMinutes,TotalAlertCount\n\
             2025-10-14,09:30:00,Math,soon,2\n",
        )
        .unwrap();

        assert!(store.import_summaries(&import_path).is_err());
    }

    #[test]
    fn settings_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());

        let mut settings = SettingsModel::default();
        settings.session_duration_minutes = 50;
        settings.subjects.push("History".to_string());
        store.save_settings(&settings).unwrap();

        let loaded = store.load_settings().unwrap();
        assert_eq!(loaded.session_duration_minutes, 50);
        assert_eq!(loaded.subjects.len(), 4);
    }

    #[test]
    fn missing_settings_load_as_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());

        let settings = store.load_settings().unwrap();
        assert_eq!(settings.session_duration_minutes, 25);
        assert_eq!(settings.subjects.len(), 3);
    }

    #[test]
    fn corrupt_settings_degrade_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());
        fs::write(dir.path().join(SETTINGS_FILE), "{not json").unwrap();

        let settings = store.load_settings().unwrap();
        assert_eq!(settings.alert_volume, 0.8);
    }

    #[test]
    fn detail_files_land_in_the_sessions_dir() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());

        let path = store
            .write_detail_file(
                NaiveDate::from_ymd_opt(2025, 10, 14).unwrap(),
                NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
                "Math",
                &[(0.0, 0.0), (5.0, 1.0)],
            )
            .unwrap();

        assert!(path.starts_with(dir.path().join(DETAIL_DIR)));
        assert!(path.exists());
    }
}
