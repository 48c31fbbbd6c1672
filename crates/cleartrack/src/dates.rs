//! Lenient ISO-8601 handling for milestone fields.
//!
//! Milestones arrive as strings from the record layer. A value that fails to
//! parse, a blank string and the `Invalid Date` sentinel are all treated as
//! absent. Nothing in here returns an error.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Sentinel written by the web front end when a date picker is cleared badly.
pub const INVALID_DATE_SENTINEL: &str = "Invalid Date";

/// Output format for derived, date-only values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Offset layouts RFC 3339 rejects: basic `+HHMM` offsets and minute precision.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Naive date-time layouts. A trailing `Z` is UTC and needs no conversion.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Returns the trimmed text when it carries a value.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parses a date-time milestone.
///
/// Offsets are not converted: the wall-clock time as written is kept, so the
/// date component never shifts. A bare `YYYY-MM-DD` is read as midnight.
pub fn parse_datetime(value: Option<&str>) -> Option<NaiveDateTime> {
    let raw = non_blank(value)?;
    if raw.eq_ignore_ascii_case(INVALID_DATE_SENTINEL) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.naive_local());
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Parses a date-only milestone, discarding any time component.
pub fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    parse_datetime(value).map(|dt| dt.date())
}

/// Formats a derived date the way it is persisted.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole calendar days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Calendar-day addition. `None` only when the result leaves chrono's range.
pub fn add_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_absent_values() {
        assert_eq!(parse_datetime(None), None);
        assert_eq!(parse_datetime(Some("")), None);
        assert_eq!(parse_datetime(Some("   ")), None);
        assert_eq!(parse_datetime(Some("Invalid Date")), None);
        assert_eq!(parse_datetime(Some("invalid date")), None);
        assert_eq!(parse_datetime(Some("not a date")), None);
        assert_eq!(parse_datetime(Some("2025-13-40")), None);
    }

    #[test]
    fn test_rfc3339_keeps_written_date() {
        let dt = parse_datetime(Some("2025-06-01T23:30:00-05:00")).unwrap();
        assert_eq!(dt.date(), ymd(2025, 6, 1));

        let dt = parse_datetime(Some("2025-06-01T00:00:00Z")).unwrap();
        assert_eq!(dt.date(), ymd(2025, 6, 1));

        let dt = parse_datetime(Some("2025-06-01T00:00:00.000Z")).unwrap();
        assert_eq!(dt.date(), ymd(2025, 6, 1));
    }

    #[test]
    fn test_basic_offsets_and_minute_precision() {
        let dt = parse_datetime(Some("2025-06-01T10:30:00+0530")).unwrap();
        assert_eq!(dt, ymd(2025, 6, 1).and_hms_opt(10, 30, 0).unwrap());

        let dt = parse_datetime(Some("2025-06-01T23:15-0500")).unwrap();
        assert_eq!(dt, ymd(2025, 6, 1).and_hms_opt(23, 15, 0).unwrap());

        for raw in ["2025-06-01T10:30Z", "2025-06-01T10:30+05:30", "2025-06-01T10:30:00.5+0530"] {
            assert_eq!(parse_date(Some(raw)), Some(ymd(2025, 6, 1)), "failed to parse '{}'", raw);
        }
    }

    #[test]
    fn test_naive_forms() {
        for raw in [
            "2025-06-01T10:30:00",
            "2025-06-01T10:30:00.250",
            "2025-06-01T10:30",
            "2025-06-01 10:30:00",
            "2025-06-01 10:30",
            "2025-06-01",
            " 2025-06-01 ",
        ] {
            assert_eq!(
                parse_date(Some(raw)),
                Some(ymd(2025, 6, 1)),
                "failed to parse '{}'",
                raw
            );
        }
    }

    #[test]
    fn test_date_only_reads_as_midnight() {
        let dt = parse_datetime(Some("2025-06-01")).unwrap();
        assert_eq!(dt.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_day_arithmetic() {
        assert_eq!(days_between(ymd(2025, 5, 30), ymd(2025, 6, 1)), 2);
        assert_eq!(days_between(ymd(2025, 6, 1), ymd(2025, 5, 30)), -2);
        assert_eq!(add_days(ymd(2025, 2, 27), 2), Some(ymd(2025, 3, 1)));
        assert_eq!(add_days(ymd(2024, 2, 28), 1), Some(ymd(2024, 2, 29)));
        assert_eq!(add_days(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2025, 6, 1)), "2025-06-01");
    }
}
