//! Schedule document model and weekly block expansion.
//!
//! A [`ScheduleDocument`] is the declarative input: a language registry and a
//! list of weekly blocks, each tagged with a concrete weekday or the `"*"`
//! wildcard. [`expand`] turns it into an [`ExpandedWeek`]: seven
//! [`ExpandedDay`]s, each holding its concrete blocks sorted by start time.

use std::collections::HashSet;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::{FormatError, duration_minutes, parse_to_minutes};
use crate::types::{LanguageCode, ValidationError};
use crate::weekday::{CANONICAL_WEEK, DaySelector};

/// Errors raised while loading or expanding a schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A block carries a malformed `start` or `end` time.
    #[error("block {index} ({title:?}) has an invalid time: {source}")]
    Format {
        index: usize,
        title: String,
        #[source]
        source: FormatError,
    },

    /// The week, registry or another input violated its contract.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The document is not valid JSON of the expected shape.
    #[error("invalid schedule document: {0}")]
    Json(#[from] serde_json::Error),
}

/// A broadcast language with its weekly airtime target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub code: LanguageCode,
    #[serde(default)]
    pub name: String,
    /// Opaque display token (usually a CSS color).
    #[serde(default)]
    pub color: String,
    /// Target share of the week, in percent.
    pub target_percent: f64,
}

/// Languages keyed by code, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    /// Builds a registry, rejecting duplicate codes.
    pub fn new(languages: Vec<Language>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for language in &languages {
            if !seen.insert(language.code.as_str()) {
                return Err(ValidationError::DuplicateLanguage {
                    code: language.code.to_string(),
                });
            }
        }
        Ok(Self { languages })
    }

    pub fn get(&self, code: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.code == code)
    }

    /// Position of `code` in registry order.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.languages.iter().position(|l| l.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// A declarative weekly program block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub day: DaySelector,
    /// Start time, `HH:MM`.
    pub start: String,
    /// End time, `HH:MM`. At or before `start` means the block runs overnight.
    pub end: String,
    pub lang: LanguageCode,
    pub title: String,
}

/// The raw schedule document supplied by the station backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDocument {
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub weekly_blocks: Vec<ScheduleBlock>,
}

impl ScheduleDocument {
    /// Parses a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the language registry for this document.
    pub fn registry(&self) -> Result<LanguageRegistry, ValidationError> {
        LanguageRegistry::new(self.languages.clone())
    }
}

/// A schedule block resolved onto one concrete weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcreteBlock {
    #[serde(serialize_with = "crate::weekday::serialize_weekday")]
    pub day: Weekday,
    pub start: String,
    pub end: String,
    pub lang: LanguageCode,
    pub title: String,
    pub start_minute: u16,
    pub end_minute: u16,
}

impl ConcreteBlock {
    /// Whether this block continues past midnight.
    pub const fn is_overnight(&self) -> bool {
        self.end_minute <= self.start_minute
    }

    pub fn duration_minutes(&self) -> u32 {
        duration_minutes(self.start_minute, self.end_minute)
    }

    /// Whether the block is on air at `minute_of_day` of the day it is listed on.
    ///
    /// Start is inclusive, end exclusive. Overnight blocks cover both the
    /// late-evening tail and the early-morning head of their own day.
    pub const fn is_live_at(&self, minute_of_day: u16) -> bool {
        if self.is_overnight() {
            minute_of_day >= self.start_minute || minute_of_day < self.end_minute
        } else {
            self.start_minute <= minute_of_day && minute_of_day < self.end_minute
        }
    }
}

/// All concrete blocks of one weekday, sorted by start minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedDay {
    #[serde(serialize_with = "crate::weekday::serialize_weekday")]
    pub day: Weekday,
    pub blocks: Vec<ConcreteBlock>,
}

/// The expanded 7×N grid, in week order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpandedWeek {
    days: Vec<ExpandedDay>,
}

impl ExpandedWeek {
    pub fn days(&self) -> &[ExpandedDay] {
        &self.days
    }

    /// The expanded list for `day`, if the week includes it.
    pub fn day(&self, day: Weekday) -> Option<&ExpandedDay> {
        self.days.iter().find(|d| d.day == day)
    }

    /// The day after `day` in week order, wrapping from the last to the first.
    pub fn following(&self, day: Weekday) -> Option<&ExpandedDay> {
        let index = self.days.iter().position(|d| d.day == day)?;
        self.days.get((index + 1) % self.days.len())
    }

    /// Every concrete block across the week, day by day.
    pub fn blocks(&self) -> impl Iterator<Item = &ConcreteBlock> {
        self.days.iter().flat_map(|d| d.blocks.iter())
    }

    /// Number of blocks on the busiest day (the N of the 7×N grid).
    pub fn max_blocks_per_day(&self) -> usize {
        self.days.iter().map(|d| d.blocks.len()).max().unwrap_or(0)
    }

    /// Returns a new week keeping only blocks in `codes`.
    ///
    /// An empty filter keeps everything.
    #[must_use]
    pub fn filter_languages(&self, codes: &[LanguageCode]) -> Self {
        if codes.is_empty() {
            return self.clone();
        }
        let days = self
            .days
            .iter()
            .map(|d| ExpandedDay {
                day: d.day,
                blocks: d
                    .blocks
                    .iter()
                    .filter(|b| codes.contains(&b.lang))
                    .cloned()
                    .collect(),
            })
            .collect();
        Self { days }
    }
}

/// Expands a document over the canonical Monday-first week.
pub fn expand(doc: &ScheduleDocument) -> Result<ExpandedWeek, ScheduleError> {
    expand_with_week(&doc.weekly_blocks, &CANONICAL_WEEK)
}

/// Expands `blocks` over `week`, which must list seven distinct weekdays.
///
/// Each day receives every block tagged with it or with the wildcard, sorted
/// by start minute. Ties keep input order. Nothing is merged or deduplicated.
pub fn expand_with_week(
    blocks: &[ScheduleBlock],
    week: &[Weekday],
) -> Result<ExpandedWeek, ScheduleError> {
    let distinct: HashSet<_> = week.iter().map(Weekday::num_days_from_monday).collect();
    if week.len() != 7 || distinct.len() != 7 {
        return Err(ValidationError::InvalidWeek { len: week.len() }.into());
    }

    // Parse every time once; a bad block fails the whole expansion.
    let parsed = blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let to_error = |source| ScheduleError::Format {
                index,
                title: block.title.clone(),
                source,
            };
            let start = parse_to_minutes(&block.start).map_err(to_error)?;
            let end = parse_to_minutes(&block.end).map_err(to_error)?;
            Ok((block, start, end))
        })
        .collect::<Result<Vec<_>, ScheduleError>>()?;

    let days: Vec<ExpandedDay> = week
        .iter()
        .map(|&day| {
            let mut day_blocks: Vec<ConcreteBlock> = parsed
                .iter()
                .filter(|(block, _, _)| block.day.matches(day))
                .map(|&(block, start_minute, end_minute)| ConcreteBlock {
                    day,
                    start: block.start.clone(),
                    end: block.end.clone(),
                    lang: block.lang.clone(),
                    title: block.title.clone(),
                    start_minute,
                    end_minute,
                })
                .collect();
            day_blocks.sort_by_key(|b| b.start_minute);
            ExpandedDay {
                day,
                blocks: day_blocks,
            }
        })
        .collect();

    tracing::debug!(
        declared = blocks.len(),
        expanded = days.iter().map(|d| d.blocks.len()).sum::<usize>(),
        "expanded weekly schedule"
    );

    Ok(ExpandedWeek { days })
}
