//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Local schedule document (JSON).
    pub schedule_path: Option<PathBuf>,

    /// Backend endpoint serving the schedule document.
    pub schedule_url: Option<String>,

    /// Trusted clock endpoint returning the current broadcast instant.
    pub clock_url: Option<String>,

    /// Bearer token for the backend endpoints.
    pub api_token: Option<String>,

    /// How often `watch` re-evaluates the schedule.
    pub poll_interval_secs: u64,

    /// Backend request timeout.
    pub request_timeout_secs: u64,

    /// Drift (percentage points) beyond which a language is flagged.
    pub drift_threshold: f64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("schedule_path", &self.schedule_path)
            .field("schedule_url", &self.schedule_url)
            .field("clock_url", &self.clock_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("drift_threshold", &self.drift_threshold)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schedule_path: None,
            schedule_url: None,
            clock_url: None,
            api_token: None,
            poll_interval_secs: 30,
            request_timeout_secs: onair_client::DEFAULT_TIMEOUT.as_secs(),
            drift_threshold: onair_core::DRIFT_ALERT_THRESHOLD,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (ONAIR_*)
        figment = figment.merge(Env::prefixed("ONAIR_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for onair.
///
/// On Linux: `~/.config/onair`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("onair"))
}
