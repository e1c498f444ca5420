use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};

use crate::models::DetailSamples;
use crate::naming;

/// Lines at the top of every detail file that carry writer-owned metadata.
/// The parser skips them without inspecting their contents.
const HEADER_LINES: usize = 2;

/// Read one detail file into index-aligned minute/alert sequences. A line
/// that does not split into exactly two numeric fields contributes a
/// `(0.0, 0.0)` sample, keeping the sequences aligned with the file's line
/// positions instead of shortening them.
pub fn parse_detail_file(path: &Path) -> Result<DetailSamples> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session detail file {}", path.display()))?;

    let mut samples = DetailSamples::default();
    for line in contents.lines().skip(HEADER_LINES) {
        let fields: Vec<&str> = line.split(',').collect();
        let (minute, alert) = if fields.len() == 2 {
            match (fields[0].parse::<f64>(), fields[1].parse::<f64>()) {
                (Ok(minute), Ok(alert)) => (minute, alert),
                _ => (0.0, 0.0),
            }
        } else {
            (0.0, 0.0)
        };
        samples.minutes.push(minute);
        samples.alerts.push(alert);
    }

    Ok(samples)
}

/// Write a detail file under `dir`, named by the encoding convention. The
/// body is the two-line header block followed by one `minutes,alerts` sample
/// per line.
pub fn write_detail_file(
    dir: &Path,
    date: NaiveDate,
    start_time: NaiveTime,
    subject: &str,
    samples: &[(f64, f64)],
) -> Result<PathBuf> {
    let file_name = naming::encode_session_file_name(date, start_time, subject);
    let path = dir.join(&file_name);

    let mut body = String::new();
    let _ = writeln!(
        body,
        "Session,{},{},{}",
        date.format("%Y-%m-%d"),
        start_time.format("%H:%M:%S"),
        subject
    );
    let _ = writeln!(body, "ElapsedMinutes,AlertCount");
    for (minute, alert) in samples {
        let _ = writeln!(body, "{},{}", minute, alert);
    }

    fs::write(&path, body)
        .with_context(|| format!("failed to write session detail file {}", path.display()))?;
    Ok(path)
}
