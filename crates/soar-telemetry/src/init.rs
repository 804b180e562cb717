//! Logging initialisation primitives.
//!
//! # Design
//! - Single entry point installing a `fmt` subscriber (pretty or JSON) on stderr.
//! - `RUST_LOG` wins over the level derived from the configuration.
//! - Stdout stays reserved for command results.

use std::env;

use anyhow::{Result, anyhow};
use soar_config::LogOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default logging level when neither `RUST_LOG` nor debug/quiet options apply.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Environment variable selecting the log format (`json` or `pretty`).
pub const LOG_FORMAT_ENV_VAR: &str = "SOAR_LOG_FORMAT";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level string (e.g., `warn`, `debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
    /// Whether ANSI escapes are emitted.
    pub ansi: bool,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::Pretty,
            ansi: false,
        }
    }
}

impl LoggingConfig<'static> {
    /// Derive the logging configuration from resolved log options and the environment.
    #[must_use]
    pub fn from_log_options(options: LogOptions) -> Self {
        Self {
            level: level_for(options),
            format: LogFormat::from_env(),
            ansi: options.use_color,
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable logs.
    Pretty,
}

impl LogFormat {
    /// Parse a format name; unknown names yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }

    /// Read the format from `SOAR_LOG_FORMAT`, defaulting to pretty.
    #[must_use]
    pub fn from_env() -> Self {
        env::var(LOG_FORMAT_ENV_VAR)
            .ok()
            .and_then(|value| Self::parse(&value))
            .unwrap_or(Self::Pretty)
    }
}

/// Level implied by the log options: `debug` wins over `quiet`.
#[must_use]
pub const fn level_for(options: LogOptions) -> &'static str {
    if options.use_debug {
        "debug"
    } else if options.quiet {
        "error"
    } else {
        DEFAULT_LOG_LEVEL
    }
}

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed (for example,
/// because another subscriber has already been set globally).
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(false)
        .with_thread_ids(false);

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(build_env_filter(config.level))
            .with(layer.json())
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(build_env_filter(config.level))
            .with(layer)
            .try_init(),
    }
    .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
