//! Publish-date rendering for news digests.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Rendered in place of a publish date that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Display format for publish dates (day.month.year, time).
pub const PUB_DATE_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// Parse a feed publish date.
///
/// RSS uses RFC 2822; some feeds emit RFC 3339 or a bare
/// `YYYY-MM-DD HH:MM:SS`, which is taken as UTC.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt: DateTime<FixedOffset>| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Render a raw publish date in `timezone`.
///
/// Never fails: unparseable input yields [`INVALID_DATE`], an unknown
/// timezone falls back to UTC.
pub fn format_pub_date(raw: &str, timezone: &str) -> String {
    let Some(dt) = parse_pub_date(raw) else {
        return INVALID_DATE.to_string();
    };

    match timezone.parse::<Tz>() {
        Ok(tz) => dt.with_timezone(&tz).format(PUB_DATE_FORMAT).to_string(),
        Err(_) => dt.format(PUB_DATE_FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rfc2822() {
        let result = format_pub_date("Tue, 15 Oct 2024 10:30:00 +0000", "UTC");
        assert_eq!(result, "15.10.2024, 10:30:00");
    }

    #[test]
    fn test_format_rfc2822_gmt() {
        let result = format_pub_date("Tue, 15 Oct 2024 10:30:00 GMT", "UTC");
        assert_eq!(result, "15.10.2024, 10:30:00");
    }

    #[test]
    fn test_format_with_timezone() {
        let result = format_pub_date("Tue, 15 Oct 2024 10:30:00 +0000", "Europe/Moscow");
        assert_eq!(result, "15.10.2024, 13:30:00"); // UTC+3
    }

    #[test]
    fn test_format_rfc3339() {
        let result = format_pub_date("2024-01-15T10:30:00+00:00", "Asia/Tokyo");
        assert_eq!(result, "15.01.2024, 19:30:00");
    }

    #[test]
    fn test_format_sqlite_style() {
        let result = format_pub_date("2024-01-15 10:30:00", "UTC");
        assert_eq!(result, "15.01.2024, 10:30:00");
    }

    #[test]
    fn test_format_invalid_date() {
        assert_eq!(format_pub_date("not a date", "UTC"), INVALID_DATE);
        assert_eq!(format_pub_date("", "UTC"), INVALID_DATE);
        assert_eq!(format_pub_date("No date", "UTC"), INVALID_DATE);
    }

    #[test]
    fn test_format_unknown_timezone_falls_back_to_utc() {
        let result = format_pub_date("Tue, 15 Oct 2024 10:30:00 +0000", "Invalid/Zone");
        assert_eq!(result, "15.10.2024, 10:30:00");
    }

    #[test]
    fn test_parse_pub_date_trims() {
        assert!(parse_pub_date("  Tue, 15 Oct 2024 10:30:00 +0000\n").is_some());
    }
}
