//! Date helper functions

use chrono::{DateTime, TimeZone, Utc};

/// Display format used on post pages, e.g. "02 Jan 2006"
pub const FRIENDLY_FORMAT: &str = "%d %b %Y";

/// Format a date for display
///
/// # Examples
/// ```ignore
/// friendly_date(Some(&date)) // -> "15 Jan 2024"
/// friendly_date(None)        // -> ""
/// ```
pub fn friendly_date<Tz: TimeZone>(date: Option<&DateTime<Tz>>) -> String {
    match date {
        Some(date) => date.with_timezone(&Utc).format(FRIENDLY_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Parse an RFC 3339 timestamp, as produced by serializing a post
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
