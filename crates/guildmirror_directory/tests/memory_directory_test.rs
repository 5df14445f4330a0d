//! Tests for the in-memory directory and the rate-limited wrapper.

use guildmirror_core::{ChannelEdit, ChannelKind, RemoteChannel, RemoteGuild, RemoteRole};
use guildmirror_directory::{DirectoryClient, InMemoryDirectory, Mutation, RateLimited};
use guildmirror_error::DirectoryErrorKind;
use std::sync::Arc;

async fn keep() -> InMemoryDirectory {
    let directory = InMemoryDirectory::new();
    directory
        .add_guild(RemoteGuild {
            id: "1".into(),
            name: "Keep".into(),
            owner_id: "9".into(),
            ..Default::default()
        })
        .await;
    directory.add_role("1", RemoteRole::new("1", "@everyone")).await;
    directory.add_role("1", RemoteRole::new("2", "Admin")).await;
    directory
        .add_channel("1", RemoteChannel::new("50", "The Aether", ChannelKind::Category))
        .await;
    directory
        .add_channel("1", RemoteChannel::new("10", "hall", ChannelKind::Text))
        .await;
    directory.add_member("1", "42").await;
    directory
}

#[tokio::test]
async fn test_guild_snapshot_includes_members_and_channels() {
    let directory = keep().await;

    let guild = directory.get_guild("1").await.unwrap();
    assert_eq!(guild.name, "Keep");
    assert_eq!(guild.members.len(), 1);
    assert_eq!(guild.channels.len(), 2);
    assert_eq!(directory.list_roles("1").await.unwrap().len(), 2);

    let err = directory.get_guild("2").await.unwrap_err();
    assert!(matches!(err.kind, DirectoryErrorKind::NotFound(_)));
}

#[tokio::test]
async fn test_removed_channel_is_unknown() {
    let directory = keep().await;

    assert!(directory.remove_channel("10").await);
    assert!(!directory.remove_channel("10").await);

    let err = directory.get_channel("10").await.unwrap_err();
    assert!(err.is_unknown_channel());
    assert_eq!(directory.list_channels("1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_writes_are_logged_once() {
    let directory = keep().await;

    let created = directory
        .create_channel("1", "cellar", ChannelKind::Text)
        .await
        .unwrap();
    let edit = ChannelEdit {
        name: "cellar".into(),
        parent_id: "50".into(),
    };
    directory.edit_channel(&created.id, &edit).await.unwrap();
    directory.edit_channel(&created.id, &edit).await.unwrap();
    directory.allow_role_view(&created.id, "2").await.unwrap();
    directory.allow_role_view(&created.id, "2").await.unwrap();

    assert_eq!(
        directory.mutations().await,
        vec![
            Mutation::CreateChannel {
                guild_id: "1".into(),
                channel_id: created.id.clone(),
                name: "cellar".into(),
                kind: ChannelKind::Text,
            },
            Mutation::EditChannel {
                channel_id: created.id.clone(),
                name: "cellar".into(),
                parent_id: "50".into(),
            },
            Mutation::AllowRoleView {
                channel_id: created.id.clone(),
                role_id: "2".into(),
            },
        ]
    );
    assert_eq!(directory.channel(&created.id).await.unwrap().parent_id, "50");
    assert_eq!(directory.view_grants(&created.id).await, vec!["2".to_string()]);
}

#[tokio::test]
async fn test_injected_failures() {
    let directory = keep().await;
    directory
        .fail_with("10", DirectoryErrorKind::Transient("boom".into()))
        .await;

    assert!(directory.get_channel("10").await.unwrap_err().is_transient());
    assert!(directory.allow_role_view("10", "2").await.is_err());

    directory.clear_failure("10").await;
    assert!(directory.get_channel("10").await.is_ok());
}

#[tokio::test]
async fn test_rate_limited_delegates_and_counts() {
    let directory = Arc::new(keep().await);
    let limited = RateLimited::per_minute(Arc::clone(&directory), 100);

    limited.get_channel("10").await.unwrap();
    limited.list_roles("1").await.unwrap();
    assert!(limited.get_channel("11").await.unwrap_err().is_unknown_channel());

    assert_eq!(directory.call_count().await, 3);
    assert!(limited.limiter().is_limited());
}

#[tokio::test]
async fn test_rate_limited_blocks_after_quota() {
    let limited = RateLimited::per_minute(keep().await, 2);

    limited.get_channel("10").await.unwrap();
    limited.get_channel("10").await.unwrap();
    assert!(!limited.limiter().try_acquire());
    assert_eq!(limited.inner().call_count().await, 2);
}
