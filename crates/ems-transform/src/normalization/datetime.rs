//! Date, time and timestamp parsing.
//!
//! Source exports mix ISO 8601, US and European orders, 12-hour clocks,
//! military times and spreadsheet serial numbers. Parsers try caller-supplied
//! patterns first, then the built-in lists below. When a value could be
//! either month-first or day-first, month-first wins.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use ems_common::{parse_f64, plausible_excel_serial};

use crate::timezone::SourceTimezone;

/// Timestamp patterns with an explicit offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Naive timestamp patterns, month-first before day-first.
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y-%m-%d %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m-%d-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y%m%d%H%M%S",
];

/// Date-only patterns, month-first before day-first.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%d/%m/%Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%d-%b-%y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y-%b-%d",
];

/// Time-of-day patterns.
pub const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S%.f",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M:%S%p",
    "%I:%M%p",
    "%I %p",
    "%I%p",
];

/// Formats a UTC instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Years accepted from free-form input. `%Y` reads one to four digits, so
/// `1/5/24` would otherwise parse as year 1 under a year-first pattern.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2199;

fn parse_fixed(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    })
}

/// Parses a value that carries its own offset (`Z`, `+05:00`, `-0700`).
pub fn parse_with_offset(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Some(dt) = parse_fixed(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let stripped = value.strip_suffix(['Z', 'z'])?;
    if !stripped.ends_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    try_naive_datetime(stripped.trim_end(), &[]).map(|naive| naive.and_utc())
}

fn try_naive_datetime(value: &str, extra: &[String]) -> Option<NaiveDateTime> {
    extra
        .iter()
        .map(String::as_str)
        .chain(DATETIME_FORMATS.iter().copied())
        .filter_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .find(|dt| YEAR_RANGE.contains(&dt.year()))
}

fn try_naive_date(value: &str, extra: &[String]) -> Option<NaiveDate> {
    extra
        .iter()
        .map(String::as_str)
        .chain(DATE_FORMATS.iter().copied())
        .filter_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .find(|date| YEAR_RANGE.contains(&date.year()))
}

/// Parses a wall-clock timestamp without applying any zone.
///
/// Date-only values resolve to midnight. Spreadsheet serials are accepted
/// inside the plausible window.
pub fn parse_naive_datetime(value: &str, extra: &[String]) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(dt) = try_naive_datetime(value, extra) {
        return Some(dt);
    }
    if let Some(date) = try_naive_date(value, extra) {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Some(dt) = parse_fixed(value) {
        return Some(dt.naive_local());
    }
    parse_f64(value).and_then(plausible_excel_serial)
}

/// Parses a timestamp and converts it to UTC.
///
/// Values with an offset keep it; naive values are interpreted in `tz`.
/// Returns `None` for unparseable values and for local times that do not
/// exist in `tz`.
pub fn parse_datetime_utc(
    value: &str,
    extra: &[String],
    tz: &SourceTimezone,
) -> Option<DateTime<Utc>> {
    if let Some(dt) = parse_with_offset(value) {
        return Some(dt);
    }
    let naive = parse_naive_datetime(value, extra)?;
    tz.to_utc(&naive)
}

/// Parses a calendar date. Timestamps contribute their date as written.
pub fn parse_date(value: &str, extra: &[String]) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    try_naive_date(value, extra).or_else(|| parse_naive_datetime(value, extra).map(|dt| dt.date()))
}

/// Parses a time of day.
///
/// Accepts `HH:MM[:SS]`, 12-hour clock with AM/PM, military `HHMM` or
/// `HHMMSS`, a spreadsheet day fraction, or a full timestamp's time.
pub fn parse_time(value: &str, extra: &[String]) -> Option<NaiveTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(time) = extra
        .iter()
        .map(String::as_str)
        .chain(TIME_FORMATS.iter().copied())
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
    {
        return Some(time);
    }
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return parse_military(value);
    }
    if let Some(fraction) = parse_f64(value).filter(|v| (0.0..1.0).contains(v)) {
        let seconds = (fraction * 86_400.0).round() as u32;
        return NaiveTime::from_num_seconds_from_midnight_opt(seconds % 86_400, 0);
    }
    parse_naive_datetime(value, extra).map(|dt| dt.time())
}

/// `930` and `0930` are 09:30, `1430` is 14:30, `143015` is 14:30:15.
fn parse_military(digits: &str) -> Option<NaiveTime> {
    let parse = |s: &str| s.parse::<u32>().ok();
    match digits.len() {
        3 | 4 => {
            let (h, m) = digits.split_at(digits.len() - 2);
            NaiveTime::from_hms_opt(parse(h)?, parse(m)?, 0)
        }
        6 => NaiveTime::from_hms_opt(
            parse(&digits[0..2])?,
            parse(&digits[2..4])?,
            parse(&digits[4..6])?,
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(value: &str, tz: &str) -> Option<String> {
        let tz: SourceTimezone = tz.parse().unwrap();
        parse_datetime_utc(value, &[], &tz).map(|dt| format_utc(&dt))
    }

    #[test]
    fn naive_values_shift_by_zone() {
        assert_eq!(
            utc("01/15/2024 08:30", "America/Chicago").as_deref(),
            Some("2024-01-15T14:30:00Z")
        );
        assert_eq!(
            utc("2024-07-04 20:15:09", "America/New_York").as_deref(),
            Some("2024-07-05T00:15:09Z")
        );
        assert_eq!(utc("2024-03-01", "UTC").as_deref(), Some("2024-03-01T00:00:00Z"));
    }

    #[test]
    fn offsets_are_honored() {
        assert_eq!(
            utc("2024-01-15T08:30:00-05:00", "America/Denver").as_deref(),
            Some("2024-01-15T13:30:00Z")
        );
        assert_eq!(
            utc("2024-01-15T08:30:00Z", "America/Denver").as_deref(),
            Some("2024-01-15T08:30:00Z")
        );
        assert_eq!(
            utc("2024-01-15 08:30:00Z", "-07:00").as_deref(),
            Some("2024-01-15T08:30:00Z")
        );
    }

    #[test]
    fn twelve_hour_and_serials() {
        assert_eq!(
            utc("01/15/2024 8:30 PM", "UTC").as_deref(),
            Some("2024-01-15T20:30:00Z")
        );
        assert_eq!(utc("45292.5", "UTC").as_deref(), Some("2024-01-01T12:00:00Z"));
        assert_eq!(utc("12", "UTC"), None);
    }

    #[test]
    fn month_first_wins_when_ambiguous() {
        let date = parse_date("03/04/2024", &[]).unwrap();
        assert_eq!(format_date(&date), "2024-03-04");
        // Day 25 cannot be a month, so day-first applies.
        let date = parse_date("25/12/2024", &[]).unwrap();
        assert_eq!(format_date(&date), "2024-12-25");
    }

    #[test]
    fn dates_in_many_shapes() {
        for (input, expected) in [
            ("2024-01-15", "2024-01-15"),
            ("1/5/24", "2024-01-05"),
            ("15-Jan-2024", "2024-01-15"),
            ("January 15, 2024", "2024-01-15"),
            ("20240115", "2024-01-15"),
            ("2024-01-15T23:59:00", "2024-01-15"),
            ("45292", "2024-01-01"),
        ] {
            let parsed = parse_date(input, &[]).map(|d| format_date(&d));
            assert_eq!(parsed.as_deref(), Some(expected), "input {input}");
        }
        assert_eq!(parse_date("not a date", &[]), None);
    }

    #[test]
    fn custom_formats_first() {
        let formats = vec!["%d/%m/%Y".to_string()];
        let date = parse_date("03/04/2024", &formats).unwrap();
        assert_eq!(format_date(&date), "2024-04-03");
    }

    #[test]
    fn times_in_many_shapes() {
        for (input, expected) in [
            ("14:30", "14:30:00"),
            ("14:30:15", "14:30:15"),
            ("2:30 PM", "14:30:00"),
            ("12:05 am", "00:05:00"),
            ("1430", "14:30:00"),
            ("930", "09:30:00"),
            ("143015", "14:30:15"),
            ("0.75", "18:00:00"),
            ("2024-01-15 06:45:00", "06:45:00"),
        ] {
            let parsed = parse_time(input, &[]).map(|t| format_time(&t));
            assert_eq!(parsed.as_deref(), Some(expected), "input {input}");
        }
        assert_eq!(parse_time("2460", &[]), None);
        assert_eq!(parse_time("later", &[]), None);
    }
}
