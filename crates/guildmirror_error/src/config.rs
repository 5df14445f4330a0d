//! Configuration error types.
//!
//! Raised while building a `MirrorConfig` from its layered sources, and
//! while turning the `[discord]` section into a working client (missing
//! token variable, unusable HTTP settings).

/// A configuration source or value could not be used.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What was wrong, naming the file, key or variable involved
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    ///
    /// ```
    /// use guildmirror_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to parse configuration: invalid type for pacing.between_nodes");
    /// assert!(err.to_string().starts_with("Configuration Error: Failed to parse"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// The environment variable meant to hold a secret is unset.
    ///
    /// ```
    /// use guildmirror_error::ConfigError;
    ///
    /// let err = ConfigError::missing_env("DISCORD_TOKEN");
    /// assert_eq!(err.message, "Environment variable DISCORD_TOKEN is not set");
    /// ```
    #[track_caller]
    pub fn missing_env(variable: &str) -> Self {
        Self::new(format!("Environment variable {} is not set", variable))
    }
}
