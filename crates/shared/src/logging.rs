//! Logging infrastructure for the anime catalog.
//!
//! Structured logging with file rotation and crate-specific log levels.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log directory path
    pub log_dir: String,
    /// Component name (used for log file naming)
    pub component: String,
    /// Default log level
    pub default_level: Level,
    /// Enable console output
    pub console: bool,
    /// Enable file output
    pub file: bool,
    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "data/logs".to_string(),
            component: "anime-catalog".to_string(),
            default_level: Level::INFO,
            console: true,
            file: true,
            json_format: false,
        }
    }
}

/// Library crates of this workspace, logged at the configured level
const WORKSPACE_TARGETS: &[&str] = &["catalog_client", "shared"];

/// HTTP stack crates, capped at `warn`
const QUIET_TARGETS: &[&str] = &["hyper", "reqwest", "h2"];

impl LogConfig {
    /// Build the `RUST_LOG`-style directive used when the environment sets none
    fn default_directive(&self) -> String {
        let component = self.component.replace('-', "_");

        let mut directives = vec![format!("{}={}", component, self.default_level)];
        directives.extend(
            WORKSPACE_TARGETS
                .iter()
                .filter(|target| **target != component)
                .map(|target| format!("{}={}", target, self.default_level)),
        );
        directives.extend(QUIET_TARGETS.iter().map(|target| format!("{}=warn", target)));

        directives.join(",")
    }
}

/// Initialize logging with the given configuration
///
/// Sets up tracing with:
/// - Daily file rotation
/// - Structured logging with contextual fields
/// - Crate-specific log levels, overridable via `RUST_LOG`
/// - Optional JSON formatting
///
/// Console output goes to stderr so that command output on stdout stays
/// machine-readable.
pub fn init(config: LogConfig) -> Result<()> {
    let log_dir = Path::new(&config.log_dir);
    if config.file {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", config.log_dir))?;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let mut layers = Vec::new();

    // Console layer (human-readable)
    if config.console {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr)
            .boxed();
        layers.push(console_layer);
    }

    // File layer with rotation
    if config.file {
        let file_appender = tracing_appender::rolling::daily(log_dir, &config.component);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_level(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(file_appender)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(file_appender)
                .boxed()
        };

        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::info!(
        component = %config.component,
        log_dir = %config.log_dir,
        "Logging initialized"
    );

    Ok(())
}
