pub mod config;
pub mod focus;
pub mod stats;
pub mod task;
pub mod timer;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Parse a reference instant. Accepts RFC 3339 (`2024-01-08T10:00:00+09:00`)
/// or a local wall-clock time without offset (`2024-01-08T10:00:00`).
pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Local>, Box<dyn std::error::Error>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| format!("invalid time '{raw}': {e}"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("'{raw}' does not exist in the local time zone").into())
}
