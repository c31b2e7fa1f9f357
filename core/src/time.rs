//! Time related utils.

use crate::Error;
use chrono::TimeZone;
use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Convert epoch seconds into datetime.
pub fn from_timestamp(secs: i64) -> crate::Result<DateTime> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| Error::request_invalid(format!("timestamp {secs} is out of range")))
}

/// Format time into date: `2020-01-01`
pub fn format_date(t: DateTime) -> String {
    t.format("%Y-%m-%d").to_string()
}
