use chrono::{DateTime, Local, NaiveDateTime};

/// Display format used across the dashboard for operation timestamps.
const MINUTE_FORMAT: &str = "%d.%m.%Y %H:%M";
/// Variant with seconds, used for the "last updated" label.
const SECOND_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

pub fn format_minute(timestamp: &DateTime<Local>) -> String {
    timestamp.format(MINUTE_FORMAT).to_string()
}

pub fn format_second(timestamp: &DateTime<Local>) -> String {
    timestamp.format(SECOND_FORMAT).to_string()
}

/// Parses a backend timestamp. The backend emits either RFC 3339 strings or
/// zoneless ISO-8601 (`2025-03-01T12:00:00`); zoneless values are taken as
/// local time.
pub fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Local));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| naive.and_local_timezone(Local).single())
}

/// Parse-and-format convenience for table rows; `None` when the raw value is
/// not a recognizable timestamp.
pub fn format_backend_timestamp(raw: &str) -> Option<String> {
    parse_backend_timestamp(raw).map(|ts| format_minute(&ts))
}
