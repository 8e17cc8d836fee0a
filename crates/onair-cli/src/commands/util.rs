//! Shared utilities for CLI commands.

use std::future::Future;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Local;
use onair_client::Client;
use onair_core::{
    ExpandedWeek, Instant, LanguageRegistry, ScheduleDocument, expand, parse_to_minutes,
    parse_weekday,
};
use regex::Regex;

use crate::Config;

/// Pre-compiled regex for `--at` instants such as "Mon 06:30".
static INSTANT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Mon|Tue|Wed|Thu|Fri|Sat|Sun)\s+(\d{1,2}:\d{2})$").unwrap()
});

/// A loaded schedule: the raw document, its registry and the expanded week.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub document: ScheduleDocument,
    pub registry: LanguageRegistry,
    pub week: ExpandedWeek,
}

impl Schedule {
    /// Expands an already-parsed document.
    pub fn from_document(document: ScheduleDocument) -> Result<Self> {
        let registry = document
            .registry()
            .context("invalid language registry")?;
        let week = expand(&document).context("failed to expand schedule")?;
        Ok(Self {
            document,
            registry,
            week,
        })
    }

    /// Reads and expands a schedule document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let document = ScheduleDocument::from_json(&json)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Self::from_document(document)
    }

    /// Loads from the configured source: local file first, then backend URL.
    pub fn load(config: &Config) -> Result<Self> {
        if let Some(path) = &config.schedule_path {
            tracing::debug!(path = %path.display(), "loading schedule from file");
            return Self::from_path(path);
        }

        if let Some(url) = &config.schedule_url {
            tracing::debug!(url, "loading schedule from backend");
            let client = backend_client(config)?;
            let document = block_on(client.fetch_schedule(url))?
                .with_context(|| format!("failed to fetch schedule from {url}"))?;
            return Self::from_document(document);
        }

        bail!(
            "no schedule source configured (pass --schedule, or set schedule_path / schedule_url)"
        )
    }
}

/// Builds a backend client from config.
pub fn backend_client(config: &Config) -> Result<Client> {
    let client = Client::new(Duration::from_secs(config.request_timeout_secs))
        .context("failed to create backend client")?;
    match config.api_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => Ok(client.with_token(token)?),
        _ => Ok(client),
    }
}

/// Runs a future to completion on a fresh runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    Ok(runtime.block_on(future))
}

/// Parses an instant such as "Mon 06:30".
pub fn parse_instant(s: &str) -> Result<Instant> {
    let Some(caps) = INSTANT_RE.captures(s.trim()) else {
        bail!("Invalid instant: {s}. Use a weekday and time (e.g., 'Mon 06:30')");
    };

    let weekday = parse_weekday(&caps[1])?;
    let minute = parse_to_minutes(&caps[2]).with_context(|| format!("invalid time in {s:?}"))?;
    Ok(Instant::new(weekday, i64::from(minute))?)
}

/// The current broadcast instant.
///
/// Asks the configured clock endpoint; without one, falls back to the local
/// clock of this machine.
pub async fn current_instant(config: &Config, client: Option<&Client>) -> Result<Instant> {
    match (&config.clock_url, client) {
        (Some(url), Some(client)) => client
            .fetch_instant(url)
            .await
            .with_context(|| format!("failed to fetch instant from {url}")),
        _ => {
            tracing::debug!("no clock endpoint configured, using local clock");
            Ok(Instant::from_datetime(Local::now().naive_local()))
        }
    }
}

/// Resolves the instant for a one-shot command: `--at` wins over the clock.
pub fn resolve_instant(config: &Config, at: Option<&str>) -> Result<Instant> {
    if let Some(at) = at {
        return parse_instant(at);
    }
    if config.clock_url.is_some() {
        let client = backend_client(config)?;
        return block_on(current_instant(config, Some(&client)))?;
    }
    block_on(current_instant(config, None))?
}
