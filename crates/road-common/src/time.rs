//! Timestamp handling for the model's documents.
//!
//! Documents carry instants in UTC truncated to whole minutes, written as
//! `2020-01-01T00:00Z`. Reading is more forgiving and also accepts the
//! truncated forms found in grid time-axis units.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

/// Output format of document timestamps.
pub const MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// Accepted input layouts, most specific first.
const INSTANT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Drop seconds and sub-seconds.
pub fn truncate_to_minute(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(instant)
}

/// Format an instant the way the model's documents expect.
pub fn format_minute(instant: DateTime<Utc>) -> String {
    instant.format(MINUTE_FORMAT).to_string()
}

/// Parse a full or truncated ISO-8601 instant, assuming UTC when no zone is given.
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in INSTANT_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    let bare = text.strip_suffix('Z').unwrap_or(text);

    // Hour only; chrono needs the minute to build a time
    if let Ok(ndt) = NaiveDateTime::parse_from_str(&format!("{}:00", bare), "%Y-%m-%dT%H:%M") {
        return Some(Utc.from_utc_datetime(&ndt));
    }

    NaiveDate::parse_from_str(bare, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_format_minute() {
        assert_eq!(format_minute(instant(6, 30, 0)), "2020-01-01T06:30Z");
    }

    #[test]
    fn test_truncate_to_minute() {
        assert_eq!(truncate_to_minute(instant(6, 30, 59)), instant(6, 30, 0));
    }

    #[test]
    fn test_parse_truncated_forms() {
        assert_eq!(parse_instant("2020-01-01T01:00Z"), Some(instant(1, 0, 0)));
        assert_eq!(parse_instant("2020-01-01T01Z"), Some(instant(1, 0, 0)));
        assert_eq!(parse_instant("2020-01-01T01:02:03Z"), Some(instant(1, 2, 3)));
        assert_eq!(parse_instant("2020-01-01 01:02:03"), Some(instant(1, 2, 3)));
        assert_eq!(parse_instant("2020-01-01"), Some(instant(0, 0, 0)));
        assert_eq!(parse_instant("2020-01-01Z"), Some(instant(0, 0, 0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_instant("yesterday"), None);
        assert_eq!(parse_instant("2020-13-01T00:00Z"), None);
    }
}
