// Shared formatting for the canonical record mappers

use chrono::{DateTime, NaiveDate, Utc};

/// Version used when a matched storefront review carries no version,
/// and for Play reviews without an app version
pub const VERSION_UNAVAILABLE: &str = "N/A";

/// Author used for Play reviews without an author name
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Truncate a provider date string to its calendar day (`YYYY-MM-DD`).
///
/// The date is taken as written, in the string's own offset, with no
/// conversion to UTC: `2024-03-15T23:30:00-07:00` is `2024-03-15`, not the
/// UTC day `2024-03-16`. Unparseable or empty input yields an empty string.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }

    // Plain dates and timestamps without an offset
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Format Unix epoch seconds as a UTC calendar day.
/// Missing or zero seconds yield an empty string.
pub fn format_epoch_seconds(seconds: Option<i64>) -> String {
    match seconds {
        Some(secs) if secs != 0 => DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Clamp a provider rating into the 0-5 star range, 0 when unknown
pub fn normalize_rating(rating: Option<i64>) -> u8 {
    rating.map(|r| r.clamp(0, 5) as u8).unwrap_or(0)
}
