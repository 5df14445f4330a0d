//! Log output setup.

use guildmirror_core::LoggingConfig;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// How logs are filtered and formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Filter used when RUST_LOG is unset (e.g., "info", "guildmirror_sync=debug")
    pub log_level: String,
    /// Enable JSON-formatted logs for structured logging
    pub json_logs: bool,
}

impl ObservabilityConfig {
    /// Text logs at the given level.
    pub fn new(log_level: impl Into<String>) -> Self {
        Self {
            log_level: log_level.into(),
            json_logs: false,
        }
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl From<&LoggingConfig> for ObservabilityConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self::new(&config.level).with_json_logs(config.json)
    }
}

/// Install the global tracing subscriber.
///
/// RUST_LOG takes precedence over the configured level.
///
/// # Errors
///
/// Fails if the level is not a valid filter or a subscriber is already set.
pub fn init_observability(config: &ObservabilityConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
