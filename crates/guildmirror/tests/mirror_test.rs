//! End-to-end tests through the facade crate.

use guildmirror::{
    ChannelKind, EntityStore, InMemoryDirectory, LoggingConfig, MirrorConfig, NavigationNode,
    ObservabilityConfig, PacingConfig, RemoteChannel, RemoteGuild, RemoteRole, SyncCoordinator,
};
use std::io::Write;
use std::sync::Arc;

async fn tower() -> Arc<InMemoryDirectory> {
    let directory = Arc::new(InMemoryDirectory::new());
    directory
        .add_guild(RemoteGuild {
            id: "2".into(),
            name: "Tower".into(),
            owner_id: "9".into(),
            ..Default::default()
        })
        .await;
    for (id, name) in [("20", "@everyone"), ("21", "Admin"), ("22", "Moderator"), ("23", "Builder")] {
        directory.add_role("2", RemoteRole::new(id, name)).await;
    }
    directory
        .add_channel("2", RemoteChannel::new("29", "The Aether", ChannelKind::Category))
        .await;
    directory
        .add_channel("2", RemoteChannel::new("30", "stairs", ChannelKind::Text))
        .await;
    directory
}

#[tokio::test]
async fn test_sync_with_configured_store() {
    let data = tempfile::tempdir().unwrap();
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[storage]\npath = {:?}\n\n[pacing]\nbetween_guilds = 0\nbetween_roles = 0\nbetween_nodes = 0\nbetween_members = 0",
        data.path()
    )
    .unwrap();
    let config = MirrorConfig::from_file(file.path()).unwrap();
    assert_eq!(config.pacing, PacingConfig::none());

    let directory = tower().await;
    {
        let store = EntityStore::open(&config.storage.path).await.unwrap();
        store
            .nodes()
            .save(&NavigationNode::new("31", "2", "stairs"))
            .await
            .unwrap();
        let coordinator = SyncCoordinator::from_config(&config, directory.clone(), store);
        let outcome = coordinator.sync_tenant("2").await.unwrap();
        assert_eq!(outcome.report().rebound, 1);
    }

    let store = EntityStore::open(&config.storage.path).await.unwrap();
    let group = store.groups().get("2").await.unwrap();
    assert_eq!(group.name, "Tower");
    assert_eq!(group.admin_role_id, "21");
    assert_eq!(store.nodes().get("30").await.unwrap().name, "stairs");
}

#[test]
fn test_observability_from_logging_config() {
    let logging = LoggingConfig {
        level: "guildmirror_sync=debug".into(),
        json: true,
    };
    let config = ObservabilityConfig::from(&logging);
    assert_eq!(config.log_level, "guildmirror_sync=debug");
    assert!(config.json_logs);
    assert_eq!(ObservabilityConfig::default().with_json_logs(false).log_level, "info");
}
