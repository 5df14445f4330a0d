//! Command handlers.

use super::{Commands, SyncCommands};
use guildmirror::{
    DiscordRestClient, EntityStore, MirrorConfig, MirrorResult, RateLimited, SyncCoordinator,
    SyncError, SyncErrorKind,
};
use std::sync::Arc;
use tracing::{info, instrument};

const CONFIRM_HINT: &str = "requires --confirm before proceeding; note that this action may take \
                            a long time to complete depending on the size of your cluster";

/// Run a parsed command against the configured store and directory.
pub async fn run(command: Commands, config: &MirrorConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Sync(SyncCommands::Guild { guild_id, confirm }) => {
            if !confirm {
                return Err(format!("sync guild {}", CONFIRM_HINT).into());
            }
            sync_guild(config, &guild_id).await?;
        }
        Commands::Sync(SyncCommands::Cluster { confirm }) => {
            if !confirm {
                return Err(format!("sync cluster {}", CONFIRM_HINT).into());
            }
            sync_cluster(config).await?;
        }
        Commands::Register { guild_id } => {
            let group = coordinator(config).await?.register_tenant(&guild_id).await?;
            println!("Guild registered: {} ({})", group.name, group.id);
        }
        Commands::Info { guild_id } => {
            let summary = coordinator(config).await?.tenant_summary(&guild_id).await?;
            println!(":satellite: Guild Information: {}", summary);
        }
        Commands::Cluster => {
            let summary = coordinator(config).await?.deployment_summary().await?;
            println!(":satellite: Cluster Information: {}", summary);
        }
        Commands::Remove { guild_id } => {
            coordinator(config).await?.remove_tenant(&guild_id).await?;
            println!("Guild removed: {}", guild_id);
        }
    }
    Ok(())
}

/// Coordinator over the configured store and a rate-limited Discord client.
///
/// Every command goes through it, so the bot token must be set even for
/// read-only commands.
async fn coordinator(config: &MirrorConfig) -> MirrorResult<SyncCoordinator> {
    let client = DiscordRestClient::from_config(&config.discord)?;
    let directory = Arc::new(RateLimited::per_minute(
        client,
        config.discord.requests_per_minute,
    ));
    let store = EntityStore::open(&config.storage.path).await?;
    Ok(SyncCoordinator::from_config(config, directory, store))
}

#[instrument(skip(config))]
async fn sync_guild(config: &MirrorConfig, guild_id: &str) -> MirrorResult<()> {
    let coordinator = coordinator(config).await?;
    if !coordinator.is_tenant_registered(guild_id).await {
        return Err(SyncError::new(SyncErrorKind::NotRegistered(guild_id.to_string())).into());
    }

    info!("Guild sync started");
    let outcome = coordinator.sync_tenant(guild_id).await?;
    println!(
        "Guild synced: {} Took: {:?} ({})",
        guild_id,
        outcome.duration(),
        outcome.report()
    );
    Ok(())
}

#[instrument(skip(config))]
async fn sync_cluster(config: &MirrorConfig) -> MirrorResult<()> {
    let coordinator = coordinator(config).await?;

    info!("Cluster sync started");
    let outcome = coordinator.sync_deployment().await?;
    println!(
        "Cluster synced, took: {:?} ({})",
        outcome.duration(),
        outcome.report()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use guildmirror::DirectoryGroup;

    const TOKEN_ENV: &str = "GUILDMIRROR_HANDLERS_TEST_TOKEN";

    fn config_at(path: &std::path::Path) -> MirrorConfig {
        let mut config = MirrorConfig::bundled().unwrap();
        config.storage.path = path.to_path_buf();
        config.discord.token_env = TOKEN_ENV.to_string();
        // SAFETY: only these tests touch this variable, and they all write the same value
        unsafe { std::env::set_var(TOKEN_ENV, "test_token") };
        config
    }

    #[tokio::test]
    async fn info_cluster_and_remove_run_through_coordinator() {
        let data = tempfile::tempdir().unwrap();
        let config = config_at(data.path());
        {
            let store = EntityStore::open(data.path()).await.unwrap();
            let mut group = DirectoryGroup::new("5");
            group.name = "Keep".into();
            store.groups().save(&group).await.unwrap();
        }

        run(Commands::Cluster, &config).await.unwrap();
        run(Commands::Info { guild_id: "5".into() }, &config).await.unwrap();
        run(Commands::Remove { guild_id: "5".into() }, &config).await.unwrap();

        assert!(run(Commands::Info { guild_id: "5".into() }, &config).await.is_err());
        assert!(run(Commands::Remove { guild_id: "5".into() }, &config).await.is_err());
        let store = EntityStore::open(data.path()).await.unwrap();
        assert!(!store.groups().is_registered("5").await);
    }

    #[tokio::test]
    async fn sync_requires_confirm() {
        let data = tempfile::tempdir().unwrap();
        let config = config_at(data.path());

        let err = run(Commands::Sync(SyncCommands::Cluster { confirm: false }), &config)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("requires --confirm"));
    }
}
