//! Helpers for the datetime strings stored by SQLite.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a stored datetime string into a UTC datetime.
///
/// The database writes `YYYY-MM-DD HH:MM:SS` in UTC; RFC3339 input is
/// accepted as well for values that arrived through the API.
pub fn parse_db_datetime(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        })
}

/// Rewrite a stored datetime string as RFC3339 for API responses.
///
/// The stored value is UTC without a zone marker, so a `Z` suffix is enough.
pub fn to_rfc3339(value: &str) -> String {
    let mut out = value.replace(' ', "T");
    out.push('Z');
    out
}
