// Timestamp helpers for status history display

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Parse an ISO-8601 timestamp as sent by the backend.
/// Accepts RFC 3339 (`2024-03-01T10:00:00Z`, with offset or fraction) and
/// naive forms without offset, which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Format a history timestamp in local time; unparseable input is shown verbatim
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => raw.trim().to_string(),
    }
}
