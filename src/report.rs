use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{SessionSeries, SessionSummary};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionTotals {
    pub session_count: usize,
    pub total_minutes: u64,
    pub total_alerts: u64,
}

impl SessionTotals {
    pub fn average_alerts(&self) -> f64 {
        if self.session_count == 0 {
            0.0
        } else {
            self.total_alerts as f64 / self.session_count as f64
        }
    }
}

pub fn select_summaries(
    summaries: &[SessionSummary],
    subject: &str,
    date: NaiveDate,
) -> Vec<SessionSummary> {
    summaries
        .iter()
        .filter(|summary| summary.subject.eq_ignore_ascii_case(subject) && summary.date == date)
        .cloned()
        .collect()
}

pub fn summarize_sessions(summaries: &[SessionSummary]) -> SessionTotals {
    let mut totals = SessionTotals {
        session_count: summaries.len(),
        total_minutes: 0,
        total_alerts: 0,
    };

    for summary in summaries {
        totals.total_minutes += u64::from(summary.session_duration_minutes);
        totals.total_alerts += u64::from(summary.total_alert_count);
    }

    totals
}

pub fn peak_alert_count(series: &SessionSeries) -> f64 {
    series
        .samples
        .alerts
        .iter()
        .copied()
        .fold(0.0, f64::max)
}

pub fn build_report(
    subject: &str,
    date: NaiveDate,
    summaries: &[SessionSummary],
    series: &[SessionSeries],
) -> String {
    let totals = summarize_sessions(summaries);

    let mut output = String::new();
    let _ = writeln!(output, "# Focus Session Report");
    let _ = writeln!(output, "Generated for {} on {}", subject, date);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recorded Sessions");

    if summaries.is_empty() {
        let _ = writeln!(output, "No sessions recorded for this date.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- started {} for {} min, {} alerts",
                summary.start_time.format("%H:%M:%S"),
                summary.session_duration_minutes,
                summary.total_alert_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Alert Timelines");

    if series.is_empty() {
        let _ = writeln!(output, "No session data available for selected filters.");
    } else {
        for entry in series.iter() {
            let final_count = entry.samples.alerts.last().copied().unwrap_or(0.0);
            let _ = writeln!(
                output,
                "- {}: {} samples, peak {:.0} alerts, {:.0} at end",
                entry.label,
                entry.samples.minutes.len(),
                peak_alert_count(entry),
                final_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Totals");
    let _ = writeln!(
        output,
        "- {} sessions, {} minutes, {} alerts ({:.1} per session)",
        totals.session_count,
        totals.total_minutes,
        totals.total_alerts,
        totals.average_alerts()
    );

    output
}
