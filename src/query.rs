use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::detail;
use crate::models::SessionSeries;
use crate::naming;

/// Collect the per-file alert series for every detail file whose name decodes
/// to the given subject (ASCII case-insensitive) and date. Files whose names
/// do not decode are excluded without comment; a file that cannot be read is
/// logged and skipped so one bad file never empties the whole result. An
/// empty vec means no file matched, which is distinct from a matched file
/// that happens to contain no samples.
pub fn query_by_combined(
    detail_dir: &Path,
    subject: &str,
    date: NaiveDate,
) -> Result<Vec<SessionSeries>> {
    if !detail_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(detail_dir)
        .with_context(|| format!("failed to read session data dir {}", detail_dir.display()))?;

    let mut file_names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            file_names.push(name.to_string());
        }
    }

    // Directory enumeration order is platform-defined; sort by name so the
    // same query always lists sessions in start-time order.
    file_names.sort();

    let mut results = Vec::new();
    for file_name in file_names {
        let decoded = match naming::decode_session_file_name(&file_name) {
            Some(decoded) => decoded,
            None => continue,
        };
        if !decoded.subject.eq_ignore_ascii_case(subject) || decoded.date != date {
            continue;
        }

        let path = detail_dir.join(&file_name);
        match detail::parse_detail_file(&path) {
            Ok(samples) => {
                let label = Path::new(&file_name)
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or(&file_name)
                    .to_string();
                results.push(SessionSeries { label, samples });
            }
            Err(err) => {
                log::warn!("skipping session file {}: {}", path.display(), err);
            }
        }
    }

    Ok(results)
}
