//! Date parsing and formatting shared by front matter and template filters.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::time::SystemTime;

/// Parse `YYYY-MM-DD`, an RFC 3339 timestamp, or integer Unix seconds.
pub fn parse(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    value.parse::<i64>().ok().and_then(from_unix)
}

/// Calendar date (UTC) of a Unix timestamp in seconds.
pub fn from_unix(seconds: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(seconds, 0).map(|datetime| datetime.date_naive())
}

/// Calendar date (UTC) of a filesystem timestamp.
pub fn from_system_time(time: SystemTime) -> NaiveDate {
    DateTime::<Utc>::from(time).date_naive()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ============================================================================
// Formatting
// ============================================================================

/// `March 5, 2024`
pub fn format_long(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `March 5` within the year of `today`, the long form otherwise.
pub fn format_short(date: NaiveDate, today: NaiveDate) -> String {
    if date.year() == today.year() {
        date.format("%B %-d").to_string()
    } else {
        format_long(date)
    }
}

/// `2024-03-05`
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(parse("2024-03-05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse(" 2024-03-05 "), Some(ymd(2024, 3, 5)));
        assert_eq!(parse("2024-03-05T23:30:00Z"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse("2024-03-05T10:00:00+02:00"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse("1709596800"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse("yesterday"), None);
        assert_eq!(parse("2024-13-01"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_format_long_and_iso() {
        let date = ymd(2024, 3, 5);
        assert_eq!(format_long(date), "March 5, 2024");
        assert_eq!(format_iso(date), "2024-03-05");
    }

    #[test]
    fn test_format_short_switches_on_year() {
        let date = ymd(2024, 3, 5);
        assert_eq!(format_short(date, ymd(2024, 12, 31)), "March 5");
        assert_eq!(format_short(date, ymd(2025, 1, 1)), "March 5, 2024");
    }

    #[test]
    fn test_from_system_time() {
        let time = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_709_596_800);
        assert_eq!(from_system_time(time), ymd(2024, 3, 5));
    }
}
