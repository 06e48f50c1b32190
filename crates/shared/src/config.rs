//! Configuration management for the anime catalog.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with defaults matching the public Jikan API's fair-use limits.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Remote catalog client settings
    pub catalog: CatalogConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Remote catalog client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Jikan API base URL
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// How long a cached response stays fresh, in seconds
    pub cache_ttl_seconds: u64,

    /// Minimum spacing between two outbound requests, in milliseconds
    pub rate_limit_interval_ms: u64,

    /// Additional attempts after the first failed request
    pub max_retries: u32,

    /// Fixed delay between attempts, in milliseconds
    pub retry_delay_ms: u64,

    /// Per-attempt timeout in seconds (None = transport default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_seconds: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.jikan.moe/v4".to_string(),
            user_agent: "anime-catalog/0.1.0".to_string(),
            cache_ttl_seconds: 30 * 60,
            rate_limit_interval_ms: 2000,
            max_retries: 3,
            retry_delay_ms: 2000,
            request_timeout_seconds: None,
        }
    }
}

impl CatalogConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn rate_limit_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limit_interval_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            catalog: CatalogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the absolute path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        let log_path = Path::new(&self.logging.log_dir);
        if log_path.is_absolute() {
            log_path.to_path_buf()
        } else {
            self.data_dir().join(log_path)
        }
    }

    /// Parse the configured default log level, falling back to INFO
    pub fn log_level(&self) -> tracing::Level {
        self.logging
            .default_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }
}
