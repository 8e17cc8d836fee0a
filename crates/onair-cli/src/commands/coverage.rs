//! Coverage command for weekly airtime per language.
//!
//! This module implements `onair coverage`, which compares each language's
//! share of the broadcast week against its programming target.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use clap::Args;
use onair_core::{
    CoverageReport, CoverageTotal, LanguageCode, LanguageRegistry, RingSegment,
    UnknownLanguageWarning, coverage, minutes_to_hours, week_percent,
};
use serde::Serialize;

use super::util::Schedule;
use crate::Config;

#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

// ========== Share Bar ==========

/// Generates a 10-character bar for a share in `0.0..=1.0`.
/// Non-zero shares below 5% get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn share_bar(share: f64) -> String {
    let filled = if share > 0.0 && share < 0.05 {
        1
    } else {
        (share * 10.0).round().clamp(0.0, 10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

// ========== Human-Readable Output ==========

/// Formats the coverage report for human-readable output.
pub fn format_coverage(
    report: &CoverageReport,
    registry: &LanguageRegistry,
    threshold: f64,
) -> String {
    let mut output = String::new();

    writeln!(output, "WEEKLY COVERAGE").unwrap();
    writeln!(output).unwrap();

    if registry.is_empty() {
        writeln!(output, "No languages configured.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<4}  {:<12}  {:>5}  {:>7}  {:>6}  {:>6}  Share",
        "Lang", "Name", "Hours", "Percent", "Target", "Drift"
    )
    .unwrap();
    writeln!(
        output,
        "────  ────────────  ─────  ───────  ──────  ──────  ──────────"
    )
    .unwrap();

    // Ring segments follow the same registry order as the totals.
    for ((code, total), segment) in report.iter().zip(report.ring_segments()) {
        let name = registry
            .get(code.as_str())
            .map(|l| l.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("-");
        let bar = share_bar(segment.share);
        let flag = if total.is_off_target(threshold) { "  !" } else { "" };
        writeln!(
            output,
            "{:<4}  {:<12}  {:>5.1}  {:>6.1}%  {:>5.1}%  {:>+6.1}  {bar}{flag}",
            code.as_str(),
            name,
            total.hours,
            total.percent,
            total.target,
            total.drift
        )
        .unwrap();
    }

    let scheduled = report.scheduled_minutes();
    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(
        output,
        "Scheduled:  {:.1}h of 168h ({:.1}%)",
        minutes_to_hours(scheduled),
        week_percent(scheduled)
    )
    .unwrap();

    let off_target = report.off_target(threshold);
    if off_target.is_empty() {
        writeln!(output, "All languages within {threshold:.1} points of target.").unwrap();
    } else {
        let codes: Vec<&str> = off_target.iter().map(|c| c.as_str()).collect();
        writeln!(
            output,
            "Off target (|drift| > {threshold:.1}): {}",
            codes.join(", ")
        )
        .unwrap();
    }

    if !report.warnings.is_empty() {
        writeln!(output).unwrap();
        for warning in &report.warnings {
            writeln!(output, "Warning: {warning}").unwrap();
        }
    }

    output
}

// ========== JSON Output ==========

/// JSON coverage structure.
#[derive(Debug, Serialize)]
pub struct JsonCoverage<'a> {
    pub threshold: f64,
    pub totals: &'a BTreeMap<LanguageCode, CoverageTotal>,
    pub ring: Vec<RingSegment>,
    pub off_target: Vec<&'a LanguageCode>,
    pub warnings: &'a [UnknownLanguageWarning],
}

/// Formats the coverage report as JSON.
pub fn format_coverage_json(report: &CoverageReport, threshold: f64) -> Result<String> {
    let json = JsonCoverage {
        threshold,
        totals: &report.totals,
        ring: report.ring_segments(),
        off_target: report.off_target(threshold),
        warnings: &report.warnings,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

pub fn run<W: Write>(
    writer: &mut W,
    args: &CoverageArgs,
    config: &Config,
    schedule: &Schedule,
) -> Result<()> {
    let report = coverage(&schedule.week, &schedule.registry);

    if args.json {
        writeln!(writer, "{}", format_coverage_json(&report, config.drift_threshold)?)?;
    } else {
        write!(
            writer,
            "{}",
            format_coverage(&report, &schedule.registry, config.drift_threshold)
        )?;
    }
    Ok(())
}
