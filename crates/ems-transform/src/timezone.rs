//! Source time zones: IANA names or fixed UTC offsets.

use std::fmt;
use std::str::FromStr;

use chrono::offset::LocalResult;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::TransformError;

/// The zone naive source values are interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTimezone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Default for SourceTimezone {
    fn default() -> Self {
        Self::Fixed(Utc.fix())
    }
}

impl SourceTimezone {
    /// Converts a local wall-clock time to UTC.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant.
    /// Times inside a DST gap return `None`.
    pub fn to_utc(&self, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Named(tz) => pick_earliest(tz.from_local_datetime(local)),
            Self::Fixed(offset) => pick_earliest(offset.from_local_datetime(local)),
        }
    }
}

fn pick_earliest<Tz2: TimeZone>(result: LocalResult<DateTime<Tz2>>) -> Option<DateTime<Utc>> {
    match result {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

impl FromStr for SourceTimezone {
    type Err = TransformError;

    /// Accepts `UTC`/`Z`, offsets (`-05:00`, `+0530`, `UTC-5`) and IANA names.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim();
        let err = || TransformError::Timezone {
            name: name.to_string(),
        };
        if ["utc", "gmt", "z"]
            .iter()
            .any(|alias| name.eq_ignore_ascii_case(alias))
        {
            return Ok(Self::default());
        }
        let offset_text = name
            .strip_prefix("UTC")
            .or_else(|| name.strip_prefix("GMT"))
            .unwrap_or(name);
        if offset_text.starts_with('+') || offset_text.starts_with('-') {
            return parse_offset(offset_text).map(Self::Fixed).ok_or_else(err);
        }
        name.parse::<Tz>().map(Self::Named).map_err(|_| err())
    }
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, digits) = if let Some(rest) = text.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = text.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
        None if digits.len() > 2 => {
            let (h, m) = digits.split_at(digits.len() - 2);
            (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)
        }
        None => (digits.parse::<i32>().ok()?, 0),
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl fmt::Display for SourceTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => f.write_str(tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn rejects_malformed_offsets() {
        for raw in ["UTC+é5", "+é530", "-05:3é", "+", "UTC-", "+ab:cd", "+15:00"] {
            assert!(
                matches!(
                    raw.parse::<SourceTimezone>(),
                    Err(TransformError::Timezone { .. })
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn parses_names_and_offsets() {
        assert_eq!(
            "America/Chicago".parse::<SourceTimezone>().unwrap(),
            SourceTimezone::Named(chrono_tz::America::Chicago)
        );
        assert_eq!(
            "-05:00".parse::<SourceTimezone>().unwrap(),
            SourceTimezone::Fixed(FixedOffset::west_opt(5 * 3600).unwrap())
        );
        assert_eq!(
            "UTC+0530".parse::<SourceTimezone>().unwrap(),
            SourceTimezone::Fixed(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap())
        );
        assert_eq!("utc".parse::<SourceTimezone>().unwrap(), SourceTimezone::default());
        assert!(matches!(
            "Mars/Olympus".parse::<SourceTimezone>(),
            Err(TransformError::Timezone { .. })
        ));
    }

    #[test]
    fn converts_across_dst() {
        let denver: SourceTimezone = "America/Denver".parse().unwrap();
        // MST (UTC-7) in January, MDT (UTC-6) in July.
        assert_eq!(
            denver.to_utc(&local(2024, 1, 15, 8, 0)).unwrap().to_rfc3339(),
            "2024-01-15T15:00:00+00:00"
        );
        assert_eq!(
            denver.to_utc(&local(2024, 7, 15, 8, 0)).unwrap().to_rfc3339(),
            "2024-07-15T14:00:00+00:00"
        );
    }

    #[test]
    fn fall_back_takes_earlier_and_gap_fails() {
        let chicago: SourceTimezone = "America/Chicago".parse().unwrap();
        // 2024-11-03 01:30 occurs twice; the first is CDT (UTC-5).
        assert_eq!(
            chicago.to_utc(&local(2024, 11, 3, 1, 30)).unwrap().to_rfc3339(),
            "2024-11-03T06:30:00+00:00"
        );
        // 2024-03-10 02:30 does not exist.
        assert!(chicago.to_utc(&local(2024, 3, 10, 2, 30)).is_none());
    }
}
