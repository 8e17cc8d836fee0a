//! Watch command for following the schedule as it airs.
//!
//! Re-evaluates on air / up next every polling interval and prints a fresh
//! view only when either program changes.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use onair_core::{ConcreteBlock, Instant};
use tokio::time::MissedTickBehavior;

use super::now::{NowView, format_now};
use super::util::{Schedule, backend_client, block_on, current_instant};
use crate::Config;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many polls (runs until interrupted by default).
    #[arg(long)]
    pub ticks: Option<u32>,
}

/// Polls `clock` every `period`, printing the view whenever live or next changes.
///
/// A failed clock read is logged and skipped; the next tick tries again.
pub async fn watch<W, F, Fut>(
    writer: &mut W,
    schedule: &Schedule,
    period: Duration,
    ticks: Option<u32>,
    mut clock: F,
) -> Result<()>
where
    W: Write,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Instant>>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last: Option<(Option<ConcreteBlock>, Option<ConcreteBlock>)> = None;
    let mut polls = 0_u32;

    while ticks.is_none_or(|max| polls < max) {
        interval.tick().await;
        polls += 1;

        let instant = match clock().await {
            Ok(instant) => instant,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "failed to read clock, skipping poll");
                continue;
            }
        };

        let view = NowView::at(schedule, instant);
        let key = (view.live.cloned(), view.next.cloned());
        if last.as_ref() == Some(&key) {
            tracing::debug!(polls, "no change on air");
            continue;
        }

        if last.is_some() {
            writeln!(writer)?;
        }
        write!(writer, "{}", format_now(&view))?;
        writer.flush()?;
        last = Some(key);
    }

    Ok(())
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &WatchArgs,
    config: &Config,
    schedule: &Schedule,
) -> Result<()> {
    let client = config
        .clock_url
        .as_ref()
        .map(|_| backend_client(config))
        .transpose()?;
    let period = Duration::from_secs(config.poll_interval_secs.max(1));
    tracing::debug!(?period, ticks = ?args.ticks, "watching schedule");

    block_on(watch(writer, schedule, period, args.ticks, || {
        current_instant(config, client.as_ref())
    }))?
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::{Context, anyhow};
    use chrono::Weekday;
    use insta::assert_snapshot;
    use onair_core::ScheduleDocument;

    const MORNING_MATIN: &str = r#"{
        "languages": [
            {"code": "en", "targetPercent": 50},
            {"code": "fr", "targetPercent": 50}
        ],
        "weeklyBlocks": [
            {"day": "*", "start": "06:00", "end": "07:00", "lang": "en", "title": "Morning"},
            {"day": "Mon", "start": "07:00", "end": "08:00", "lang": "fr", "title": "Matin"}
        ]
    }"#;

    fn schedule(json: &str) -> Schedule {
        Schedule::from_document(ScheduleDocument::from_json(json).unwrap()).unwrap()
    }

    fn at(day: Weekday, minute: i64) -> Result<Instant> {
        Ok(Instant::new(day, minute)?)
    }

    async fn run_watch(json: &str, instants: Vec<Result<Instant>>) -> String {
        let ticks = u32::try_from(instants.len()).unwrap();
        let mut instants = instants.into_iter();
        let mut output = Vec::new();
        watch(
            &mut output,
            &schedule(json),
            Duration::from_millis(1),
            Some(ticks),
            move || {
                let next = instants.next().context("clock exhausted");
                async move { next? }
            },
        )
        .await
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn watch_prints_only_on_change() {
        let output = run_watch(
            MORNING_MATIN,
            vec![at(Weekday::Mon, 390), at(Weekday::Mon, 405), at(Weekday::Mon, 430)],
        )
        .await;

        assert_snapshot!(output, @r"
        ON AIR: Mon 06:30
        Now:  06:00-07:00  en    Morning
        Next: Mon 07:00-08:00  fr    Matin

        ON AIR: Mon 07:10
        Now:  07:00-08:00  fr    Matin
        Next: Tue 06:00-07:00  en    Morning
        ");
    }

    #[tokio::test]
    async fn watch_skips_failed_clock_reads() {
        let output = run_watch(
            MORNING_MATIN,
            vec![Err(anyhow!("clock unavailable")), at(Weekday::Sun, 1380)],
        )
        .await;

        assert!(output.starts_with("ON AIR: Sun 23:00\n"));
        assert!(output.contains("Now:  (nothing on air)"));
        assert!(output.contains("Next: Mon 06:00-07:00  en    Morning"));
    }

    #[tokio::test]
    async fn watch_distinguishes_blocks_sharing_a_start() {
        // Both start Tue 06:00; "Headlines" ends first and "Morning" stays live.
        let output = run_watch(
            r#"{
                "languages": [{"code": "en", "targetPercent": 100}],
                "weeklyBlocks": [
                    {"day": "Tue", "start": "06:00", "end": "06:30", "lang": "en", "title": "Headlines"},
                    {"day": "*", "start": "06:00", "end": "07:00", "lang": "en", "title": "Morning"}
                ]
            }"#,
            vec![at(Weekday::Tue, 370), at(Weekday::Tue, 400)],
        )
        .await;

        assert_snapshot!(output, @r"
        ON AIR: Tue 06:10
        Now:  06:00-06:30  en    Headlines
        Next: Wed 06:00-07:00  en    Morning

        ON AIR: Tue 06:40
        Now:  06:00-07:00  en    Morning
        Next: Wed 06:00-07:00  en    Morning
        ");
    }
}
