//! Wall-clock `HH:MM` codec.
//!
//! All times are minute-of-day values in the single broadcast timezone.
//! A block whose end is at or before its start runs past midnight.

use thiserror::Error;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Minutes in one seven-day week.
pub const MINUTES_PER_WEEK: u32 = 7 * 1440;

/// A malformed wall-clock time string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Not of the shape `H:MM` / `HH:MM`.
    #[error("expected HH:MM, got {value:?}")]
    Malformed { value: String },

    /// Hour component above 23.
    #[error("hour out of range in {value:?}")]
    HourOutOfRange { value: String },

    /// Minute component above 59.
    #[error("minute out of range in {value:?}")]
    MinuteOutOfRange { value: String },
}

/// Parses `"HH:MM"` into a minute-of-day in `0..=1439`.
///
/// The hour may be one or two digits; the minute must be two digits.
pub fn parse_to_minutes(hhmm: &str) -> Result<u16, FormatError> {
    let malformed = || FormatError::Malformed {
        value: hhmm.to_string(),
    };

    let (hour, minute) = hhmm.trim().split_once(':').ok_or_else(malformed)?;
    if hour.is_empty()
        || hour.len() > 2
        || minute.len() != 2
        || !hour.bytes().all(|b| b.is_ascii_digit())
        || !minute.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }

    let hour: u16 = hour.parse().map_err(|_| malformed())?;
    let minute: u16 = minute.parse().map_err(|_| malformed())?;

    if hour > 23 {
        return Err(FormatError::HourOutOfRange {
            value: hhmm.to_string(),
        });
    }
    if minute > 59 {
        return Err(FormatError::MinuteOutOfRange {
            value: hhmm.to_string(),
        });
    }

    Ok(hour * 60 + minute)
}

/// Length of a block in minutes.
///
/// `end <= start` is an overnight block: `(1440 - start) + end`. An equal
/// start and end therefore covers a full day.
///
/// Both arguments are minutes-of-day in `0..=1439`, as produced by
/// [`parse_to_minutes`]. Out-of-range input saturates instead of panicking.
pub fn duration_minutes(start: u16, end: u16) -> u32 {
    if end > start {
        u32::from(end - start)
    } else {
        u32::from(MINUTES_PER_DAY).saturating_sub(u32::from(start)) + u32::from(end)
    }
}

/// Formats a minute-of-day as `HH:MM`.
pub fn format_minutes(minute_of_day: u16) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wall_clock_times() {
        assert_eq!(parse_to_minutes("00:00").unwrap(), 0);
        assert_eq!(parse_to_minutes("06:30").unwrap(), 390);
        assert_eq!(parse_to_minutes("6:30").unwrap(), 390);
        assert_eq!(parse_to_minutes("23:59").unwrap(), 1439);
    }

    #[test]
    fn rejects_malformed_times() {
        for input in ["", "0630", "06:3", "06:300", "ab:cd", ":30", "06:", "-1:00", "06:30:00"] {
            assert!(
                matches!(parse_to_minutes(input), Err(FormatError::Malformed { .. })),
                "{input:?} should be malformed"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(matches!(
            parse_to_minutes("24:00"),
            Err(FormatError::HourOutOfRange { .. })
        ));
        assert!(matches!(
            parse_to_minutes("12:60"),
            Err(FormatError::MinuteOutOfRange { .. })
        ));
    }

    #[test]
    fn same_day_duration_matches_difference() {
        for (start, end) in [("00:00", "00:01"), ("09:00", "10:00"), ("06:15", "23:59")] {
            let s = parse_to_minutes(start).unwrap();
            let e = parse_to_minutes(end).unwrap();
            assert_eq!(duration_minutes(s, e), u32::from(e - s));
        }
    }

    #[test]
    fn overnight_duration_wraps_midnight() {
        let start = parse_to_minutes("23:00").unwrap();
        let end = parse_to_minutes("01:00").unwrap();
        assert_eq!(duration_minutes(start, end), 120);
    }

    #[test]
    fn equal_start_and_end_is_full_day() {
        assert_eq!(duration_minutes(360, 360), 1440);
        assert_eq!(duration_minutes(0, 0), 1440);
    }

    #[test]
    fn out_of_range_start_does_not_underflow() {
        assert_eq!(duration_minutes(2000, 100), 100);
        assert_eq!(duration_minutes(u16::MAX, 0), 0);
        assert_eq!(duration_minutes(1439, 1439), 1440);
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(format_minutes(0), "00:00");
        assert_eq!(format_minutes(390), "06:30");
        assert_eq!(format_minutes(1439), "23:59");
    }
}
