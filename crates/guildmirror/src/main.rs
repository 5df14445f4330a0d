//! guildmirror CLI binary.
//!
//! This binary provides command-line access to the mirror:
//! - Sync one guild or the whole cluster against Discord
//! - Register and remove guilds
//! - Show what the mirror knows

use clap::Parser;
use guildmirror::{MirrorConfig, ObservabilityConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::Cli;

    // Load .env before configuration so the token variable is visible
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MirrorConfig::from_file(path)?,
        None => MirrorConfig::load()?,
    };

    let mut observability =
        ObservabilityConfig::from(&config.logging).with_json_logs(config.logging.json || cli.json_logs);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    init_observability(&observability)?;

    cli::run(cli.command, &config).await
}
