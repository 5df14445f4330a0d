//! Layered configuration.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from guildmirror.toml)
//! - User overrides (~/.config/guildmirror/guildmirror.toml, then ./guildmirror.toml)
//! - Environment overrides (`GUILDMIRROR__PACING__BETWEEN_NODES=0`)

use crate::WellKnownRole;
use config::{Config, Environment, File, FileFormat};
use guildmirror_error::{ConfigError, MirrorError, MirrorResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../guildmirror.toml");

/// Discord API access.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscordConfig {
    /// Base URL of the REST API
    pub api_base: String,
    /// Environment variable holding the bot token
    pub token_env: String,
    /// Upper bound on directory calls per minute
    pub requests_per_minute: u32,
}

/// Where the entity store keeps its collections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding `Groups.json` and `Nodes.json`
    pub path: PathBuf,
}

/// Fixed delays between remote calls, in milliseconds.
///
/// ```toml
/// [pacing]
/// between_guilds = 10_000
/// between_roles = 2_000
/// between_nodes = 5_000
/// between_members = 1_000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct PacingConfig {
    /// Delay between guilds in a deployment-wide sync
    #[serde(default)]
    pub between_guilds: u64,
    /// Delay before each well-known role lookup
    #[serde(default)]
    pub between_roles: u64,
    /// Delay before each node repair
    #[serde(default)]
    pub between_nodes: u64,
    /// Delay before each member repair
    #[serde(default)]
    pub between_members: u64,
}

impl PacingConfig {
    /// No delays at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Delay between guilds.
    pub fn guild_delay(&self) -> Duration {
        Duration::from_millis(self.between_guilds)
    }

    /// Delay before each role lookup.
    pub fn role_delay(&self) -> Duration {
        Duration::from_millis(self.between_roles)
    }

    /// Delay before each node repair.
    pub fn node_delay(&self) -> Duration {
        Duration::from_millis(self.between_nodes)
    }

    /// Delay before each member repair.
    pub fn member_delay(&self) -> Duration {
        Duration::from_millis(self.between_members)
    }
}

/// Labels of the well-known roles.
///
/// The everyone role has no label; it is always found by
/// [`WellKnownRole::EVERYONE_NAME`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RolesConfig {
    /// Label of the admin role
    pub admin: String,
    /// Label of the moderator role
    pub moderator: String,
    /// Label of the builder role
    pub builder: String,
}

impl RolesConfig {
    /// Label configured for a well-known role, or the reserved name for
    /// the everyone role.
    pub fn label(&self, role: WellKnownRole) -> &str {
        match role {
            WellKnownRole::Admin => &self.admin,
            WellKnownRole::Moderator => &self.moderator,
            WellKnownRole::Builder => &self.builder,
            WellKnownRole::Everyone => WellKnownRole::EVERYONE_NAME,
        }
    }
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            admin: "Admin".to_string(),
            moderator: "Moderator".to_string(),
            builder: "Builder".to_string(),
        }
    }
}

/// Repair policy settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepairConfig {
    /// Name of the category recreated channels are moved under
    pub default_category: String,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            default_category: "The Aether".to_string(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json: bool,
}

/// Top-level guildmirror configuration.
///
/// # Example
///
/// ```no_run
/// use guildmirror_core::MirrorConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MirrorConfig::load()?;
/// println!("Pausing {:?} between nodes", config.pacing.node_delay());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MirrorConfig {
    /// Discord API access
    pub discord: DiscordConfig,
    /// Entity store location
    pub storage: StorageConfig,
    /// Delays between remote calls
    pub pacing: PacingConfig,
    /// Well-known role labels
    pub roles: RolesConfig,
    /// Repair policy
    pub repair: RepairConfig,
    /// Log output
    pub logging: LoggingConfig,
}

impl MirrorConfig {
    /// Load the bundled defaults with a single override file on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> MirrorResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> MirrorResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/guildmirror/guildmirror.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("guildmirror").required(false))
            .add_source(
                Environment::with_prefix("GUILDMIRROR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// Bundled defaults only.
    pub fn bundled() -> MirrorResult<Self> {
        Self::finish(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> MirrorResult<Self> {
        builder
            .build()
            .map_err(|e| {
                MirrorError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MirrorError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
