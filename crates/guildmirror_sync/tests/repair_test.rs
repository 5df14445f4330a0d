//! Drift repairer tests, including a store persisted to disk.

use guildmirror_core::{
    ChannelKind, NavigationNode, RemoteChannel, RemoteGuild, RemoteRole, RolesConfig,
    WellKnownRole,
};
use guildmirror_directory::{InMemoryDirectory, Mutation};
use guildmirror_rate_limit::NoPacing;
use guildmirror_store::EntityStore;
use guildmirror_sync::{DriftRepairer, NoPermissionSync, NodeOutcome, RoleResolver};
use std::sync::Arc;

async fn directory_without_category() -> Arc<InMemoryDirectory> {
    let directory = Arc::new(InMemoryDirectory::new());
    directory
        .add_guild(RemoteGuild {
            id: "1".into(),
            name: "Keep".into(),
            ..Default::default()
        })
        .await;
    directory
        .add_channel("1", RemoteChannel::new("20", "hall", ChannelKind::Category))
        .await;
    directory
}

fn repairer(directory: &Arc<InMemoryDirectory>, store: &EntityStore) -> DriftRepairer {
    DriftRepairer::new(
        directory.clone(),
        store.clone(),
        Arc::new(NoPermissionSync),
        Arc::new(NoPacing),
        "The Aether",
    )
}

#[tokio::test]
async fn test_category_named_like_node_is_not_rebound() {
    let directory = directory_without_category().await;
    let store = EntityStore::in_memory();
    let node = NavigationNode::new("10", "1", "hall");
    store.nodes().save(&node).await.unwrap();

    let outcome = repairer(&directory, &store).repair_node(&node).await.unwrap();

    assert_eq!(outcome, NodeOutcome::Recreated);
    let mutations = directory.mutations().await;
    assert_eq!(mutations.len(), 1, "no category edit without a default category");
    let Mutation::CreateChannel { channel_id, .. } = &mutations[0] else {
        panic!("expected a created channel, got {:?}", mutations[0]);
    };
    assert_eq!(directory.channel(channel_id).await.unwrap().parent_id, "");
    assert_eq!(store.nodes().get(channel_id).await.unwrap().name, "hall");
    assert!(store.nodes().get("10").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_repairs_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let directory = directory_without_category().await;
    directory
        .add_channel("1", RemoteChannel::new("30", "cellar", ChannelKind::Text))
        .await;

    {
        let store = EntityStore::open(dir.path()).await.unwrap();
        let mut node = NavigationNode::new("11", "1", "cellar");
        node.role_id = "5".into();
        store.nodes().save(&node).await.unwrap();

        let report = repairer(&directory, &store).repair_nodes("1").await.unwrap();
        assert_eq!(report.rebound, 1);
    }

    let store = EntityStore::open(dir.path()).await.unwrap();
    let nodes = store.nodes().list().await.unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, "30");
    assert_eq!(nodes[0].role_id, "5");
}

#[tokio::test]
async fn test_role_resolution_title_cases_labels() {
    let directory = directory_without_category().await;
    directory
        .add_role("1", RemoteRole::new("7", "Game Master"))
        .await;
    directory
        .add_role("1", RemoteRole::new("8", "@everyone"))
        .await;
    let resolver = RoleResolver::new(directory.clone(), RolesConfig::default());

    assert_eq!(resolver.resolve("1", "game master").await.unwrap(), "7");
    assert!(resolver.resolve("1", "builder").await.unwrap_err().is_not_found());
    assert_eq!(
        resolver
            .resolve_well_known("1", WellKnownRole::Everyone)
            .await
            .unwrap(),
        "8"
    );
}
