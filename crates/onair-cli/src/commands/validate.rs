//! Validate command for linting a schedule before it goes on air.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use onair_core::{ScheduleIssue, validate_schedule};
use serde::Serialize;

use super::util::Schedule;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct JsonValidation<'a> {
    blocks: usize,
    issues: &'a [ScheduleIssue],
}

/// Lints the schedule; fails when any issue is found.
pub fn run<W: Write>(writer: &mut W, args: &ValidateArgs, schedule: &Schedule) -> Result<()> {
    let issues = validate_schedule(&schedule.week, &schedule.registry);
    let blocks = schedule.week.blocks().count();

    if args.json {
        let json = JsonValidation {
            blocks,
            issues: &issues,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&json)?)?;
    } else if issues.is_empty() {
        writeln!(writer, "Schedule OK: {blocks} blocks across 7 days")?;
    } else {
        for issue in &issues {
            writeln!(writer, "{issue}")?;
        }
    }

    if !issues.is_empty() {
        bail!("schedule has {} issue(s)", issues.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use onair_core::ScheduleDocument;

    fn schedule(blocks: &str) -> Schedule {
        let json = format!(
            r#"{{"languages": [{{"code": "en", "targetPercent": 100}}], "weeklyBlocks": [{blocks}]}}"#
        );
        Schedule::from_document(ScheduleDocument::from_json(&json).unwrap()).unwrap()
    }

    #[test]
    fn clean_schedule_passes() {
        let schedule = schedule(
            r#"{"day": "*", "start": "06:00", "end": "07:00", "lang": "en", "title": "Morning"}"#,
        );
        let mut output = Vec::new();
        run(&mut output, &ValidateArgs { json: false }, &schedule).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Schedule OK: 7 blocks across 7 days\n"
        );
    }

    #[test]
    fn overlap_and_unknown_language_fail() {
        let schedule = schedule(
            r#"{"day": "Mon", "start": "06:00", "end": "07:00", "lang": "en", "title": "News"},
               {"day": "Mon", "start": "06:30", "end": "08:00", "lang": "xx", "title": "Talk"}"#,
        );
        let mut output = Vec::new();
        let err = run(&mut output, &ValidateArgs { json: false }, &schedule).unwrap_err();
        assert_eq!(err.to_string(), "schedule has 2 issue(s)");

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Mon: \"News\" and \"Talk\" overlap by 30m"));
        assert!(output.contains("Mon: \"Talk\" uses unknown language xx"));
    }

    #[test]
    fn json_lists_issues_by_kind() {
        let schedule = schedule(
            r#"{"day": "Tue", "start": "23:00", "end": "01:00", "lang": "en", "title": "Late"},
               {"day": "Tue", "start": "00:30", "end": "02:00", "lang": "en", "title": "Early"}"#,
        );
        let mut output = Vec::new();
        assert!(run(&mut output, &ValidateArgs { json: true }, &schedule).is_err());

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["blocks"], 2);
        assert_eq!(value["issues"][0]["kind"], "overlap");
        assert_eq!(value["issues"][0]["day"], "Tue");
        assert_eq!(value["issues"][0]["minutes"], 30);
    }
}
