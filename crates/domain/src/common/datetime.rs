//! DateTime parsing utilities with consistent error handling.

use chrono::{DateTime, Utc};

/// Parses an RFC3339 timestamp string, returning an error if parsing fails.
///
/// # Examples
///
/// ```
/// use polvo_domain::common::parse_datetime;
/// use chrono::Datelike;
///
/// let dt = parse_datetime("2024-01-15T10:30:00Z").unwrap();
/// assert_eq!(dt.year(), 2024);
/// ```
///
/// # Errors
///
/// Returns `chrono::ParseError` if the string is not valid RFC3339.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Formats a timestamp the way stores persist it (RFC3339, UTC).
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
