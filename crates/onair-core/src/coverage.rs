//! Weekly airtime coverage per language.
//!
//! Sums the duration of every concrete block across the seven expanded days
//! and compares each language's share of the week against its target.
//!
//! # Algorithm Summary
//!
//! 1. Start a zeroed accumulator for every registered language
//! 2. Add each block's duration (overnight-aware) to its language
//! 3. Derive hours, percent of week and drift, all rounded to one decimal

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::Serialize;
use thiserror::Error;

use crate::schedule::{ExpandedWeek, LanguageRegistry};
use crate::time::MINUTES_PER_WEEK;
use crate::types::LanguageCode;
use crate::weekday::weekday_label;

/// Drift (in percentage points) beyond which a language is flagged off target.
pub const DRIFT_ALERT_THRESHOLD: f64 = 2.0;

/// Rounds to one decimal place, half away from zero.
///
/// Only exact for values whose halves are representable; hours and percent
/// go through [`minutes_to_hours`] and [`week_percent`] instead.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `minutes * scale / per_unit`, rounded to one decimal, half away from zero.
///
/// The numerator is scaled to tenths before the single division, so an exact
/// `.x5` quotient is never nudged below the half by float error.
fn ratio_round1(minutes: u32, per_unit: u32, scale: f64) -> f64 {
    (f64::from(minutes) * scale * 10.0 / f64::from(per_unit)).round() / 10.0
}

/// Minutes as hours, rounded to one decimal.
pub fn minutes_to_hours(minutes: u32) -> f64 {
    ratio_round1(minutes, 60, 1.0)
}

/// Minutes as a percentage of the week, rounded to one decimal.
pub fn week_percent(minutes: u32) -> f64 {
    ratio_round1(minutes, MINUTES_PER_WEEK, 100.0)
}

/// Weekly airtime for one language.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageTotal {
    pub minutes: u32,
    pub hours: f64,
    pub percent: f64,
    pub target: f64,
    /// `percent - target`; positive means over-scheduled.
    pub drift: f64,
}

impl CoverageTotal {
    fn from_minutes(minutes: u32, target: f64) -> Self {
        let percent = week_percent(minutes);
        Self {
            minutes,
            hours: minutes_to_hours(minutes),
            percent,
            target,
            drift: round1(percent - target),
        }
    }

    /// Whether `|drift|` exceeds `threshold`.
    pub fn is_off_target(&self, threshold: f64) -> bool {
        self.drift.abs() > threshold
    }
}

/// A block referenced a language missing from the registry.
///
/// Non-fatal: the block still shows in the grid and the live/next views but
/// contributes nothing to coverage.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("block {title:?} on {} references unknown language {lang}", day_label(.day))]
pub struct UnknownLanguageWarning {
    pub lang: LanguageCode,
    pub title: String,
    #[serde(serialize_with = "crate::weekday::serialize_weekday")]
    pub day: Weekday,
}

/// One slice of the proportional coverage ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingSegment {
    pub code: LanguageCode,
    /// Fraction of all registered airtime, in `0.0..=1.0`.
    pub share: f64,
}

/// Coverage for every registered language plus any warnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub totals: BTreeMap<LanguageCode, CoverageTotal>,
    /// Registry order, for stable presentation.
    #[serde(skip)]
    order: Vec<LanguageCode>,
    pub warnings: Vec<UnknownLanguageWarning>,
}

impl CoverageReport {
    pub fn get(&self, code: &str) -> Option<&CoverageTotal> {
        self.totals.get(code)
    }

    /// Totals in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&LanguageCode, &CoverageTotal)> {
        self.order
            .iter()
            .filter_map(|code| self.totals.get(code).map(|total| (code, total)))
    }

    /// Languages whose drift exceeds `threshold`, in registry order.
    pub fn off_target(&self, threshold: f64) -> Vec<&LanguageCode> {
        self.iter()
            .filter(|(_, total)| total.is_off_target(threshold))
            .map(|(code, _)| code)
            .collect()
    }

    /// Sum of all registered languages' minutes.
    pub fn scheduled_minutes(&self) -> u32 {
        self.totals.values().map(|t| t.minutes).sum()
    }

    /// Proportional shares of scheduled airtime, for the coverage ring.
    ///
    /// All shares are zero when nothing is scheduled.
    pub fn ring_segments(&self) -> Vec<RingSegment> {
        let scheduled = f64::from(self.scheduled_minutes());
        self.iter()
            .map(|(code, total)| RingSegment {
                code: code.clone(),
                share: if scheduled > 0.0 {
                    f64::from(total.minutes) / scheduled
                } else {
                    0.0
                },
            })
            .collect()
    }
}

/// Computes weekly coverage for every language in `languages`.
pub fn coverage(week: &ExpandedWeek, languages: &LanguageRegistry) -> CoverageReport {
    let mut minutes = vec![0_u32; languages.len()];
    let mut warnings = Vec::new();

    for block in week.blocks() {
        match languages.position(block.lang.as_str()) {
            Some(index) => minutes[index] += block.duration_minutes(),
            None => {
                tracing::warn!(
                    lang = %block.lang,
                    title = %block.title,
                    day = weekday_label(block.day),
                    "block references unknown language, excluded from coverage"
                );
                warnings.push(UnknownLanguageWarning {
                    lang: block.lang.clone(),
                    title: block.title.clone(),
                    day: block.day,
                });
            }
        }
    }

    let order: Vec<LanguageCode> = languages.iter().map(|l| l.code.clone()).collect();
    let totals = languages
        .iter()
        .zip(minutes)
        .map(|(language, minutes)| {
            (
                language.code.clone(),
                CoverageTotal::from_minutes(minutes, language.target_percent),
            )
        })
        .collect();

    CoverageReport {
        totals,
        order,
        warnings,
    }
}

fn day_label(day: &Weekday) -> &'static str {
    weekday_label(*day)
}
