//! Date and time column combining.

use chrono::NaiveTime;

use crate::normalization::{format_utc, parse_date, parse_time};
use crate::timezone::SourceTimezone;

/// Why a date/time pair could not be combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineFailure {
    Date,
    Time,
    /// The local time falls in a daylight-saving gap.
    NonexistentLocalTime,
}

impl CombineFailure {
    pub fn message(self) -> &'static str {
        match self {
            Self::Date => "not a date",
            Self::Time => "not a time of day",
            Self::NonexistentLocalTime => "local time does not exist in the source time zone",
        }
    }
}

/// Combines a date value and an optional time value into a UTC timestamp
/// (`YYYY-MM-DDTHH:MM:SSZ`).
///
/// The wall-clock time is interpreted in `tz`. A missing or blank time means
/// midnight. Ambiguous local times take the earlier instant.
pub fn combine_date_time(
    date: &str,
    time: Option<&str>,
    tz: &SourceTimezone,
    formats: &[String],
) -> Result<String, CombineFailure> {
    let date = parse_date(date, formats).ok_or(CombineFailure::Date)?;
    let time = match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => parse_time(raw, formats).ok_or(CombineFailure::Time)?,
        None => NaiveTime::MIN,
    };
    let utc = tz
        .to_utc(&date.and_time(time))
        .ok_or(CombineFailure::NonexistentLocalTime)?;
    Ok(format_utc(&utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combine(date: &str, time: Option<&str>, tz: &str) -> Result<String, CombineFailure> {
        combine_date_time(date, time, &tz.parse().unwrap(), &[])
    }

    #[test]
    fn combines_in_zone() {
        assert_eq!(
            combine("01/15/2024", Some("0830"), "America/Chicago").as_deref(),
            Ok("2024-01-15T14:30:00Z")
        );
        assert_eq!(
            combine("2024-07-04", Some("9:15 PM"), "America/Los_Angeles").as_deref(),
            Ok("2024-07-05T04:15:00Z")
        );
        assert_eq!(
            combine("2024-01-15", None, "UTC").as_deref(),
            Ok("2024-01-15T00:00:00Z")
        );
    }

    #[test]
    fn datetime_date_part_is_used() {
        assert_eq!(
            combine("2024-01-15 00:00:00", Some("13:00"), "UTC").as_deref(),
            Ok("2024-01-15T13:00:00Z")
        );
    }

    #[test]
    fn dst_edges() {
        assert_eq!(
            combine("2024-11-03", Some("01:30"), "America/Chicago").as_deref(),
            Ok("2024-11-03T06:30:00Z")
        );
        assert_eq!(
            combine("2024-03-10", Some("02:30"), "America/Chicago"),
            Err(CombineFailure::NonexistentLocalTime)
        );
    }

    #[test]
    fn reports_which_part_failed() {
        assert_eq!(
            combine("someday", Some("12:00"), "UTC"),
            Err(CombineFailure::Date)
        );
        assert_eq!(
            combine("2024-01-15", Some("noonish"), "UTC"),
            Err(CombineFailure::Time)
        );
    }
}
