//! Tests for the group and node repositories.

use guildmirror_core::{DirectoryGroup, NavigationNode, WellKnownRole};
use guildmirror_store::EntityStore;

async fn store_with_group(id: &str) -> EntityStore {
    let store = EntityStore::in_memory();
    let mut group = DirectoryGroup::new(id);
    group.name = "Keep".into();
    store.groups().save(&group).await.unwrap();
    store
}

#[tokio::test]
async fn test_role_and_member_mutators_are_idempotent() {
    let store = store_with_group("1001").await;
    let groups = store.groups();

    groups.add_role("1001", "5").await.unwrap();
    groups.add_role("1001", "5").await.unwrap();
    groups.add_member("1001", "42").await.unwrap();
    groups.add_member("1001", "42").await.unwrap();

    let group = groups.get("1001").await.unwrap();
    assert_eq!(group.role_ids.len(), 1);
    assert_eq!(group.member_ids.len(), 1);

    groups.remove_role("1001", "5").await.unwrap();
    groups.remove_member("1001", "4").await.unwrap();
    let group = groups.get("1001").await.unwrap();
    assert!(group.role_ids.is_empty());
    assert!(group.member_ids.contains("42"));
}

#[tokio::test]
async fn test_mutators_on_unknown_group_fail_not_found() {
    let store = EntityStore::in_memory();
    let err = store.groups().add_role("404", "5").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_registration_and_removal() {
    let store = store_with_group("1001").await;
    let groups = store.groups();

    assert!(groups.is_registered("1001").await);
    assert!(!groups.is_registered("1002").await);

    groups.remove("1001").await.unwrap();
    assert!(!groups.is_registered("1001").await);
    assert!(groups.remove("1001").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_get_by_name_requires_matching_id() {
    let store = store_with_group("1001").await;
    let groups = store.groups();

    assert_eq!(groups.get_by_name("Keep", "1001").await.unwrap().id, "1001");
    assert!(groups.get_by_name("Keep", "1002").await.is_err());
    assert!(groups.get_by_name("Tower", "1001").await.is_err());
}

#[tokio::test]
async fn test_well_known_role_ids() {
    let store = store_with_group("1001").await;
    let groups = store.groups();

    groups
        .set_role_id("1001", WellKnownRole::Moderator, "77")
        .await
        .unwrap();
    assert_eq!(
        groups.role_id("1001", WellKnownRole::Moderator).await.unwrap(),
        "77"
    );
    assert_eq!(groups.role_id("1001", WellKnownRole::Admin).await.unwrap(), "");
}

#[tokio::test]
async fn test_nodes_filtered_by_guild() {
    let store = EntityStore::in_memory();
    let nodes = store.nodes();
    nodes.save(&NavigationNode::new("1", "100", "hall")).await.unwrap();
    nodes.save(&NavigationNode::new("2", "100", "cellar")).await.unwrap();
    nodes.save(&NavigationNode::new("3", "200", "hall")).await.unwrap();

    let mut names: Vec<_> = nodes
        .list_for_guild("100")
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["cellar", "hall"]);
    assert_eq!(nodes.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_rebind_moves_primary_key() {
    let store = EntityStore::in_memory();
    let nodes = store.nodes();
    let mut hall = NavigationNode::new("A", "100", "hall");
    hall.role_id = "9".into();
    nodes.save(&hall).await.unwrap();

    let rebound = nodes.rebind(&hall, "B").await.unwrap();

    assert_eq!(rebound.id, "B");
    assert_eq!(rebound.role_id, "9");
    assert!(nodes.find_bound_to("A").await.unwrap().is_none());
    assert_eq!(nodes.find_bound_to("B").await.unwrap(), Some(rebound));
    assert_eq!(nodes.list().await.unwrap().len(), 1);
}
