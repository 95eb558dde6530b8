//! Configuration management for CiteSweep.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Command-line flags are layered on top by
//! the binary.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/citesweep/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote lookup service settings
    pub service: ServiceConfig,
    /// Harvest (citation discovery) settings
    pub harvest: HarvestConfig,
    /// Detail enrichment settings
    pub enrich: EnrichConfig,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults if
    /// not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// When `path` is `None` the default config path is used.
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Supports the following variables:
    /// - `CITESWEEP_BASE_URL`: Override the lookup service base URL
    /// - `CITESWEEP_CONCURRENCY`: Override worker count for both stages
    /// - `CITESWEEP_COOLDOWN_SECS`: Override the downtime cooldown
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CITESWEEP_BASE_URL") {
            tracing::debug!("Override service.base_url from env: {}", url);
            self.service.base_url = url;
        }

        if let Some(val) = lookup("CITESWEEP_CONCURRENCY") {
            let workers: usize = val.parse().map_err(|_| ConfigError::InvalidValue {
                field: "CITESWEEP_CONCURRENCY".to_string(),
                reason: format!("expected a positive integer, got '{val}'"),
            })?;
            self.harvest.concurrency = workers;
            self.enrich.concurrency = workers;
            tracing::debug!("Override concurrency from env: {}", workers);
        }

        if let Some(val) = lookup("CITESWEEP_COOLDOWN_SECS") {
            let secs: u64 = val.parse().map_err(|_| ConfigError::InvalidValue {
                field: "CITESWEEP_COOLDOWN_SECS".to_string(),
                reason: format!("expected seconds, got '{val}'"),
            })?;
            self.harvest.downtime_cooldown_secs = secs;
            tracing::debug!("Override harvest.downtime_cooldown_secs from env: {}", secs);
        }

        Ok(())
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(config_dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(config_dir)?;
        }
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/citesweep/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "citesweep", "citesweep").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Remote lookup service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL the search and detail pages live under
    pub base_url: String,
    /// User agent string
    pub user_agent: String,
    /// Request timeout in seconds (0 = transport default, no timeout)
    pub timeout_secs: u64,
}

impl ServiceConfig {
    /// Request timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.paymycite.com".to_string(),
            user_agent: concat!("citesweep/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 0,
        }
    }
}

/// Harvest (citation discovery) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Number of parallel lookup workers
    pub concurrency: usize,
    /// Capacity of the bounded query queue
    pub queue_capacity: usize,
    /// Log a progress line every this many processed results
    pub progress_interval: u64,
    /// Pause applied to a worker that hits the downtime signature
    pub downtime_cooldown_secs: u64,
    /// First agency ID (inclusive)
    pub start_agency: u32,
    /// Last agency ID (inclusive)
    pub end_agency: u32,
    /// First citation number (inclusive)
    pub start_cite_num: u64,
    /// Last citation number (inclusive)
    pub end_cite_num: u64,
    /// Basic-record store, opened in append mode
    pub output: PathBuf,
}

impl HarvestConfig {
    /// Downtime cooldown as a [`Duration`].
    #[must_use]
    pub fn downtime_cooldown(&self) -> Duration {
        Duration::from_secs(self.downtime_cooldown_secs)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            concurrency: 16,
            queue_capacity: 100,
            progress_interval: 100,
            downtime_cooldown_secs: 10,
            start_agency: 0,
            end_agency: 500,
            start_cite_num: 100_000,
            end_cite_num: 999_999,
            output: PathBuf::from("output.csv"),
        }
    }
}

/// Detail enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Number of parallel detail workers
    pub concurrency: usize,
    /// Basic-record store produced by a harvest run
    pub input: PathBuf,
    /// Enriched-record store, truncated on start
    pub output: PathBuf,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            concurrency: 16,
            input: PathBuf::from("output.csv"),
            output: PathBuf::from("details.csv"),
        }
    }
}
