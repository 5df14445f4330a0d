//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// guildmirror - keep a local mirror of Discord guilds in sync
#[derive(Parser, Debug)]
#[command(name = "guildmirror")]
#[command(about = "Keep a local mirror of Discord guilds, roles and room channels in sync", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true, env = "GUILDMIRROR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Repair drift between the mirror and the directory
    #[command(subcommand)]
    Sync(SyncCommands),

    /// Register a guild with the mirror
    Register {
        /// Guild ID
        guild_id: String,
    },

    /// Show what the mirror knows about a guild
    Info {
        /// Guild ID
        guild_id: String,
    },

    /// List every mirrored guild
    Cluster,

    /// Forget a guild
    Remove {
        /// Guild ID
        guild_id: String,
    },
}

/// Sync subcommands
#[derive(Subcommand, Debug)]
pub enum SyncCommands {
    /// Sync one registered guild
    Guild {
        /// Guild ID
        guild_id: String,

        /// Proceed even though the sync may take a long time
        #[arg(long)]
        confirm: bool,
    },

    /// Sync every registered guild, one after another
    Cluster {
        /// Proceed even though the sync may take a long time
        #[arg(long)]
        confirm: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sync_guild() {
        let cli = Cli::try_parse_from(["guildmirror", "sync", "guild", "123", "--confirm"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sync(SyncCommands::Guild { ref guild_id, confirm: true }) if guild_id == "123"
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["guildmirror", "cluster", "--json-logs", "-v"]).unwrap();
        assert!(cli.json_logs);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Cluster));
    }

    #[test]
    fn guild_id_is_required() {
        assert!(Cli::try_parse_from(["guildmirror", "info"]).is_err());
    }
}
