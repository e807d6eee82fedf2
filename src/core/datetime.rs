//! Timestamp formatting for table cells.

use chrono::{DateTime, Local, TimeZone, Utc};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder for absent timestamps.
pub const MISSING: &str = "-";

/// Render in the local timezone.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    format_in(value, &Local)
}

pub fn format_optional(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(format_datetime)
        .unwrap_or_else(|| MISSING.to_string())
}

fn format_in<Tz: TimeZone>(value: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    value.with_timezone(tz).format(DATETIME_FORMAT).to_string()
}
