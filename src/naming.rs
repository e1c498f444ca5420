use std::path::Path;

use chrono::{NaiveDate, NaiveTime};

/// Metadata recovered from a detail file's name. The filename is the only
/// index: no manifest or database maps files to subjects and dates.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSessionFile {
    pub date: NaiveDate,
    pub subject: String,
}

/// Build the detail file name `Session_<yyyyMMdd>_<HHmmss>_<subject>.csv`.
pub fn encode_session_file_name(date: NaiveDate, start_time: NaiveTime, subject: &str) -> String {
    format!(
        "Session_{}_{}_{}.csv",
        date.format("%Y%m%d"),
        start_time.format("%H%M%S"),
        subject
    )
}

/// Decode a detail file name: strip the extension, split on `_`, take the
/// date from token 1 (strict `yyyyMMdd`) and the subject from token 3.
/// Returns `None` for too few tokens or a date token that does not parse,
/// which excludes the file from queries without raising an error.
pub fn decode_session_file_name(file_name: &str) -> Option<DecodedSessionFile> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    let tokens: Vec<&str> = stem.split('_').collect();
    if tokens.len() < 4 {
        return None;
    }

    let date_token = tokens[1];
    if date_token.len() != 8 {
        return None;
    }
    let date = NaiveDate::parse_from_str(date_token, "%Y%m%d").ok()?;

    Some(DecodedSessionFile {
        date,
        subject: tokens[3].to_string(),
    })
}
