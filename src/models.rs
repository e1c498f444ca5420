use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One row of the summary log, written when a study session completes.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub subject: String,
    pub session_duration_minutes: u32,
    pub total_alert_count: u32,
}

impl SessionSummary {
    /// Serialize as `date,startTime,subject,duration,alertCount`. The format
    /// has no quoting, so a subject containing a comma corrupts the row.
    pub fn to_csv_string(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.date.format("%Y-%m-%d"),
            self.start_time.format("%H:%M:%S"),
            self.subject,
            self.session_duration_minutes,
            self.total_alert_count
        )
    }

    /// Parse one log line. Total over malformed input: a wrong field count or
    /// an unparsable date, time, or number yields `None`, so untrusted file
    /// lines can be fed in directly.
    pub fn from_csv_string(line: &str) -> Option<SessionSummary> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 5 {
            return None;
        }

        let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d").ok()?;
        let start_time = NaiveTime::parse_from_str(fields[1], "%H:%M:%S").ok()?;
        let session_duration_minutes = fields[3].parse::<u32>().ok()?;
        let total_alert_count = fields[4].parse::<u32>().ok()?;

        Some(SessionSummary {
            date,
            start_time,
            subject: fields[2].to_string(),
            session_duration_minutes,
            total_alert_count,
        })
    }

    /// Header line written when the summary log is created, and skipped as a
    /// sentinel when the log is read back.
    pub fn csv_header() -> &'static str {
        "Date,StartTime,Subject,SessionDurationMinutes,TotalAlertCount"
    }
}

/// Per-user configuration. Plain data holder; fields are not validated on
/// assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsModel {
    pub session_duration_minutes: u32,
    pub alert_threshold_seconds: f64,
    pub warning_threshold_seconds: f64,
    pub alert_volume: f64,
    pub subjects: Vec<String>,
}

impl Default for SettingsModel {
    fn default() -> Self {
        Self {
            session_duration_minutes: 25,
            alert_threshold_seconds: 5.0,
            warning_threshold_seconds: 3.0,
            alert_volume: 0.8,
            subjects: vec![
                "Math".to_string(),
                "Science".to_string(),
                "English".to_string(),
            ],
        }
    }
}

/// Index-aligned elapsed-minute and alert-count sequences from one detail
/// file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailSamples {
    pub minutes: Vec<f64>,
    pub alerts: Vec<f64>,
}

/// Samples from one detail file paired with a display label (the file's base
/// name).
#[derive(Debug, Clone)]
pub struct SessionSeries {
    pub label: String,
    pub samples: DetailSamples,
}
