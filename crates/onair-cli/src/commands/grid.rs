//! Grid command for printing the expanded weekly schedule.
//!
//! This module implements `onair grid`, which lays out every day of the
//! broadcast week with its programs in start order.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use clap::Args;
use onair_core::{ConcreteBlock, ExpandedWeek, LanguageCode, weekday_label};

use super::util::Schedule;

#[derive(Debug, Args)]
pub struct GridArgs {
    /// Only show programs in this language (repeatable).
    #[arg(long)]
    pub lang: Vec<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// One grid row: `HH:MM-HH:MM  lang  title`, marking overnight blocks.
pub fn format_block(block: &ConcreteBlock) -> String {
    let overnight = if block.is_overnight() { " (overnight)" } else { "" };
    format!(
        "{}-{}  {:<4}  {}{overnight}",
        block.start,
        block.end,
        block.lang.as_str(),
        block.title
    )
}

/// Formats the week for human-readable output.
pub fn format_grid(week: &ExpandedWeek) -> String {
    let mut output = String::new();

    writeln!(output, "WEEKLY GRID (7 × {})", week.max_blocks_per_day()).unwrap();

    for day in week.days() {
        writeln!(output).unwrap();
        writeln!(output, "{}", weekday_label(day.day)).unwrap();
        if day.blocks.is_empty() {
            writeln!(output, "  (no programs)").unwrap();
            continue;
        }
        for block in &day.blocks {
            writeln!(output, "  {}", format_block(block)).unwrap();
        }
    }

    output
}

pub fn run<W: Write>(writer: &mut W, args: &GridArgs, schedule: &Schedule) -> Result<()> {
    let codes = args
        .lang
        .iter()
        .map(|code| LanguageCode::new(code.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let week = schedule.week.filter_languages(&codes);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&week)?)?;
    } else {
        write!(writer, "{}", format_grid(&week))?;
    }
    Ok(())
}
