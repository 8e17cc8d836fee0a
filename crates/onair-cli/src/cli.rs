//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::coverage::CoverageArgs;
use crate::commands::grid::GridArgs;
use crate::commands::now::NowArgs;
use crate::commands::validate::ValidateArgs;
use crate::commands::watch::WatchArgs;

/// Broadcast schedule engine.
///
/// Expands the station's weekly program grid and reports what is on air,
/// what is up next, and how weekly airtime splits across languages.
#[derive(Debug, Parser)]
#[command(name = "onair", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Schedule document to use instead of the configured source.
    #[arg(short, long, global = true)]
    pub schedule: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the expanded weekly grid.
    Grid(GridArgs),

    /// Show the program on air and the one up next.
    Now(NowArgs),

    /// Show weekly airtime per language against targets.
    Coverage(CoverageArgs),

    /// Check the schedule for overlaps and unknown languages.
    Validate(ValidateArgs),

    /// Keep re-evaluating on air / up next on the polling interval.
    Watch(WatchArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_now_with_instant() {
        let cli = Cli::try_parse_from(["onair", "now", "--at", "Mon 06:30", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Now(args)) => {
                assert_eq!(args.at.as_deref(), Some("Mon 06:30"));
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_repeated_language_filter() {
        let cli = Cli::try_parse_from([
            "onair", "-s", "week.json", "grid", "--lang", "en", "--lang", "fr",
        ])
        .unwrap();
        assert_eq!(cli.schedule, Some(PathBuf::from("week.json")));
        match cli.command {
            Some(Commands::Grid(args)) => assert_eq!(args.lang, ["en", "fr"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
