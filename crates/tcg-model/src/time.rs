//! Timestamp parsing for backend `created_at` values
//!
//! The backend writes Python `isoformat()` strings, usually without an
//! offset. Offsets, a space separator and bare dates are accepted too.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp into wall-clock time as written
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Calendar date of a timestamp
#[inline]
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn python_isoformat() {
        assert_eq!(parse_date("2026-03-04T10:11:12.123456"), Some(date(2026, 3, 4)));
        assert_eq!(parse_date("2026-03-04T10:11:12"), Some(date(2026, 3, 4)));
    }

    #[test]
    fn offsets_and_spaces() {
        assert_eq!(parse_date("2026-03-04T23:30:00+05:00"), Some(date(2026, 3, 4)));
        assert_eq!(parse_date("2026-03-04 08:00:00"), Some(date(2026, 3, 4)));
    }

    #[test]
    fn bare_date() {
        assert_eq!(parse_date("2026-03-04"), Some(date(2026, 3, 4)));
    }

    #[test]
    fn garbage_rejected() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
