use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use onair_cli::commands::util::Schedule;
use onair_cli::commands::{coverage, grid, now, validate, watch};
use onair_cli::{Cli, Commands, Config};

/// Load config, apply `--schedule`, and load the schedule it points at.
fn load_schedule(cli: &Cli) -> Result<(Schedule, Config)> {
    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = &cli.schedule {
        config.schedule_path = Some(path.clone());
    }
    tracing::debug!(?config, "loaded configuration");

    let schedule = Schedule::load(&config)?;
    tracing::debug!(
        blocks = schedule.week.blocks().count(),
        languages = schedule.registry.len(),
        "loaded schedule"
    );
    Ok((schedule, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (schedule, config) = load_schedule(&cli)?;
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Grid(args) => grid::run(&mut stdout, args, &schedule)?,
        Commands::Now(args) => now::run(&mut stdout, args, &config, &schedule)?,
        Commands::Coverage(args) => coverage::run(&mut stdout, args, &config, &schedule)?,
        Commands::Validate(args) => validate::run(&mut stdout, args, &schedule)?,
        Commands::Watch(args) => watch::run(&mut stdout, args, &config, &schedule)?,
    }

    Ok(())
}
