//! On-air and up-next resolution against an expanded week.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::schedule::{ConcreteBlock, ExpandedWeek};
use crate::time::MINUTES_PER_DAY;
use crate::types::ValidationError;
use crate::weekday::{parse_weekday, weekday_label};

/// A point in the broadcast week: weekday plus minute-of-day.
///
/// Always comes from a trusted clock; the engine never samples the system
/// clock itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInstant", into = "RawInstant")]
pub struct Instant {
    weekday: Weekday,
    minute_of_day: u16,
}

impl Instant {
    /// Creates an instant, rejecting minutes outside `0..=1439`.
    pub fn new(weekday: Weekday, minute_of_day: i64) -> Result<Self, ValidationError> {
        let minute_of_day = u16::try_from(minute_of_day)
            .ok()
            .filter(|m| *m < MINUTES_PER_DAY)
            .ok_or(ValidationError::MinuteOutOfRange {
                value: minute_of_day,
            })?;
        Ok(Self {
            weekday,
            minute_of_day,
        })
    }

    /// Creates an instant from a `Mon`..`Sun` label.
    pub fn from_label(label: &str, minute_of_day: i64) -> Result<Self, ValidationError> {
        Self::new(parse_weekday(label)?, minute_of_day)
    }

    /// Instant of a broadcast-local wall-clock date and time.
    pub fn from_datetime(local: NaiveDateTime) -> Self {
        let minute_of_day = local.hour() * 60 + local.minute();
        Self {
            weekday: local.weekday(),
            // hour <= 23 and minute <= 59, so this always fits.
            minute_of_day: u16::try_from(minute_of_day).unwrap_or(MINUTES_PER_DAY - 1),
        }
    }

    pub const fn weekday(self) -> Weekday {
        self.weekday
    }

    pub const fn minute_of_day(self) -> u16 {
        self.minute_of_day
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInstant {
    weekday: String,
    minute_of_day: i64,
}

impl TryFrom<RawInstant> for Instant {
    type Error = ValidationError;

    fn try_from(raw: RawInstant) -> Result<Self, Self::Error> {
        Self::from_label(&raw.weekday, raw.minute_of_day)
    }
}

impl From<Instant> for RawInstant {
    fn from(instant: Instant) -> Self {
        Self {
            weekday: weekday_label(instant.weekday).to_string(),
            minute_of_day: i64::from(instant.minute_of_day),
        }
    }
}

/// The block on air at `instant`, if any.
///
/// Only the instant's own weekday is scanned. When blocks overlap, the first
/// one in start order wins.
pub fn live_now(week: &ExpandedWeek, instant: Instant) -> Option<&ConcreteBlock> {
    week.day(instant.weekday)?
        .blocks
        .iter()
        .find(|block| block.is_live_at(instant.minute_of_day))
}

/// The next block to start after `instant`.
///
/// Searches the rest of today, then the first block of the following day.
/// An empty following day yields `None`; no further days are scanned.
pub fn next_up(week: &ExpandedWeek, instant: Instant) -> Option<&ConcreteBlock> {
    let today = week.day(instant.weekday)?;
    if let Some(block) = today
        .blocks
        .iter()
        .find(|block| block.start_minute > instant.minute_of_day)
    {
        return Some(block);
    }

    week.following(instant.weekday)?.blocks.first()
}
