//! Weekly broadcast-schedule engine.
//!
//! This crate contains the pure, synchronous logic for:
//! - Time codec: `HH:MM` parsing and overnight-aware durations
//! - Expansion: turning declarative weekly blocks into a 7×N grid
//! - Resolution: the program on air now and the one up next
//! - Coverage: per-language weekly airtime against targets
//!
//! Nothing here reads a clock or performs I/O; every operation is a function
//! of an expanded week and, where needed, an externally supplied [`Instant`].

pub mod coverage;
pub mod resolve;
pub mod schedule;
pub mod time;
pub mod types;
mod validate;
pub mod weekday;

pub use coverage::{
    CoverageReport, CoverageTotal, DRIFT_ALERT_THRESHOLD, RingSegment, UnknownLanguageWarning,
    coverage, minutes_to_hours, round1, week_percent,
};
pub use resolve::{Instant, live_now, next_up};
pub use schedule::{
    ConcreteBlock, ExpandedDay, ExpandedWeek, Language, LanguageRegistry, ScheduleBlock,
    ScheduleDocument, ScheduleError, expand, expand_with_week,
};
pub use time::{FormatError, duration_minutes, format_minutes, parse_to_minutes};
pub use types::{LanguageCode, ValidationError};
pub use validate::{ScheduleIssue, validate_schedule};
pub use weekday::{CANONICAL_WEEK, DaySelector, parse_weekday, weekday_label};
