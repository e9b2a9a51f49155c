//! Publish-date parsing and display formatting.
//!
//! Platforms disagree on date formats: RSS uses RFC 2822, the JSON APIs
//! use RFC 3339, and the JSON feed relay emits `YYYY-MM-DD HH:MM:SS` in UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse a date string in any of the formats seen in feeds and APIs.
#[must_use]
pub fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    // Naive timestamps are treated as UTC
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, fmt) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

/// Epoch milliseconds of the first candidate that parses, or `0`.
///
/// Candidates are tried in priority order; empty candidates are skipped.
#[must_use]
pub fn first_timestamp_ms<'a, I>(candidates: I) -> i64
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find_map(parse_date)
        .map_or(0, |dt| dt.timestamp_millis())
}

/// Format a timestamp as `YYYY/MM/DD` in the given offset.
///
/// Returns an empty string for `0` (unknown) timestamps.
#[must_use]
pub fn format_display_date(published_at_ms: i64, offset: FixedOffset) -> String {
    if published_at_ms == 0 {
        return String::new();
    }
    match offset.timestamp_millis_opt(published_at_ms).single() {
        Some(dt) => dt.format("%Y/%m/%d").to_string(),
        None => String::new(),
    }
}

/// Build a fixed offset from whole hours east of UTC.
#[must_use]
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}
