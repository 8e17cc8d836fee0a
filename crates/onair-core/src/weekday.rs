//! Weekday labels and the wildcard day selector.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Label used in schedule documents for "every day of the week".
pub const WILDCARD_LABEL: &str = "*";

/// The canonical Monday-first broadcast week.
pub const CANONICAL_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Short label for a weekday as used in schedule documents.
pub const fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Parses a `Mon`..`Sun` label.
pub fn parse_weekday(label: &str) -> Result<Weekday, ValidationError> {
    CANONICAL_WEEK
        .iter()
        .copied()
        .find(|day| weekday_label(*day) == label)
        .ok_or_else(|| ValidationError::UnknownWeekday {
            value: label.to_string(),
        })
}

pub(crate) fn serialize_weekday<S>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(weekday_label(*day))
}

/// Which days a declarative schedule block airs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DaySelector {
    /// A single concrete weekday.
    Specific(Weekday),
    /// Every day of the week (`"*"` in documents).
    Every,
}

impl DaySelector {
    /// Whether a block with this selector airs on `day`.
    pub fn matches(self, day: Weekday) -> bool {
        match self {
            Self::Specific(d) => d == day,
            Self::Every => true,
        }
    }
}

impl fmt::Display for DaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Specific(day) => f.write_str(weekday_label(*day)),
            Self::Every => f.write_str(WILDCARD_LABEL),
        }
    }
}

impl FromStr for DaySelector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == WILDCARD_LABEL {
            Ok(Self::Every)
        } else {
            parse_weekday(s).map(Self::Specific)
        }
    }
}

impl Serialize for DaySelector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DaySelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
