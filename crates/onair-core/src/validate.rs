//! Optional schedule lint pass.
//!
//! The resolvers assume a curated, non-overlapping schedule and never
//! check it. This pass reports what a curator would want to fix, without
//! changing how live/next/coverage behave.

use std::fmt;

use chrono::Weekday;
use serde::Serialize;

use crate::schedule::{ConcreteBlock, ExpandedWeek, LanguageRegistry};
use crate::time::{MINUTES_PER_DAY, format_minutes};
use crate::types::LanguageCode;
use crate::weekday::weekday_label;

/// A problem found in an expanded schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleIssue {
    /// Two blocks listed on the same day share airtime.
    Overlap {
        #[serde(serialize_with = "crate::weekday::serialize_weekday")]
        day: Weekday,
        first: String,
        second: String,
        minutes: u32,
    },
    /// A block references a language missing from the registry.
    UnknownLanguage {
        #[serde(serialize_with = "crate::weekday::serialize_weekday")]
        day: Weekday,
        lang: LanguageCode,
        title: String,
    },
}

impl fmt::Display for ScheduleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap {
                day,
                first,
                second,
                minutes,
            } => write!(
                f,
                "{}: {first:?} and {second:?} overlap by {minutes}m",
                weekday_label(*day)
            ),
            Self::UnknownLanguage { day, lang, title } => write!(
                f,
                "{}: {title:?} uses unknown language {lang}",
                weekday_label(*day)
            ),
        }
    }
}

/// Same-day spans a block covers on the day it is listed on.
fn spans(block: &ConcreteBlock) -> Vec<(u16, u16)> {
    if !block.is_overnight() {
        return vec![(block.start_minute, block.end_minute)];
    }
    let mut spans = vec![(block.start_minute, MINUTES_PER_DAY)];
    if block.end_minute > 0 {
        spans.push((0, block.end_minute));
    }
    spans
}

fn overlap_minutes(a: &ConcreteBlock, b: &ConcreteBlock) -> u32 {
    let b_spans = spans(b);
    spans(a)
        .iter()
        .flat_map(|&(a_start, a_end)| {
            b_spans.iter().map(move |&(b_start, b_end)| {
                let start = a_start.max(b_start);
                let end = a_end.min(b_end);
                u32::from(end.saturating_sub(start))
            })
        })
        .sum()
}

/// Reports overlapping blocks and unknown languages, day by day.
pub fn validate_schedule(week: &ExpandedWeek, languages: &LanguageRegistry) -> Vec<ScheduleIssue> {
    let mut issues = Vec::new();

    for day in week.days() {
        for (i, first) in day.blocks.iter().enumerate() {
            if !languages.contains(first.lang.as_str()) {
                issues.push(ScheduleIssue::UnknownLanguage {
                    day: day.day,
                    lang: first.lang.clone(),
                    title: first.title.clone(),
                });
            }

            for second in &day.blocks[i + 1..] {
                let minutes = overlap_minutes(first, second);
                if minutes > 0 {
                    let window = format!(
                        "{}-{}",
                        format_minutes(second.start_minute),
                        format_minutes(second.end_minute)
                    );
                    tracing::warn!(
                        day = weekday_label(day.day),
                        first = %first.title,
                        second = %second.title,
                        window,
                        minutes,
                        "overlapping schedule blocks"
                    );
                    issues.push(ScheduleIssue::Overlap {
                        day: day.day,
                        first: first.title.clone(),
                        second: second.title.clone(),
                        minutes,
                    });
                }
            }
        }
    }

    issues
}
