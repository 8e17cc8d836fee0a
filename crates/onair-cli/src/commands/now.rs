//! Now command for showing the live and next programs.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use clap::Args;
use onair_core::{ConcreteBlock, Instant, format_minutes, live_now, next_up, weekday_label};
use serde::Serialize;

use super::grid::format_block;
use super::util::{Schedule, resolve_instant};
use crate::Config;

#[derive(Debug, Args)]
pub struct NowArgs {
    /// Evaluate at this instant instead of the clock (e.g., "Mon 06:30").
    #[arg(long)]
    pub at: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Live and next programs at one instant.
#[derive(Debug, Serialize)]
pub struct NowView<'a> {
    pub instant: Instant,
    pub live: Option<&'a ConcreteBlock>,
    pub next: Option<&'a ConcreteBlock>,
}

impl<'a> NowView<'a> {
    pub fn at(schedule: &'a Schedule, instant: Instant) -> Self {
        Self {
            instant,
            live: live_now(&schedule.week, instant),
            next: next_up(&schedule.week, instant),
        }
    }
}

/// Formats the view for human-readable output.
pub fn format_now(view: &NowView<'_>) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "ON AIR: {} {}",
        weekday_label(view.instant.weekday()),
        format_minutes(view.instant.minute_of_day())
    )
    .unwrap();

    match view.live {
        Some(block) => writeln!(output, "Now:  {}", format_block(block)).unwrap(),
        None => writeln!(output, "Now:  (nothing on air)").unwrap(),
    }
    match view.next {
        Some(block) => writeln!(
            output,
            "Next: {} {}",
            weekday_label(block.day),
            format_block(block)
        )
        .unwrap(),
        None => writeln!(output, "Next: (nothing scheduled)").unwrap(),
    }

    output
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &NowArgs,
    config: &Config,
    schedule: &Schedule,
) -> Result<()> {
    let instant = resolve_instant(config, args.at.as_deref())?;
    let view = NowView::at(schedule, instant);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&view)?)?;
    } else {
        write!(writer, "{}", format_now(&view))?;
    }
    Ok(())
}
