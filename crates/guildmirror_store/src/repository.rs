//! Repositories for directory groups and navigation nodes.
//!
//! Thin, typed layers over a [`Collection`] with the lookups and mutators
//! the rest of guildmirror needs. Every mutator is read-modify-save; callers
//! that modify many fields at once should load the record, change it and
//! call `save` once.

use crate::{Collection, Record};
use guildmirror_core::{DirectoryGroup, NavigationNode, WellKnownRole};
use guildmirror_error::{StoreError, StoreResult};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Repository for [`DirectoryGroup`] records.
#[derive(Clone)]
pub struct GroupRepository {
    collection: Arc<dyn Collection<DirectoryGroup>>,
}

impl GroupRepository {
    /// Wraps a collection.
    pub fn new(collection: Arc<dyn Collection<DirectoryGroup>>) -> Self {
        Self { collection }
    }

    /// Create or replace a group.
    pub async fn save(&self, group: &DirectoryGroup) -> StoreResult<()> {
        self.collection.save(group).await
    }

    /// Group by guild id.
    pub async fn get(&self, guild_id: &str) -> StoreResult<DirectoryGroup> {
        self.collection.get_by_id(guild_id).await
    }

    /// Group whose name and id both match.
    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str, guild_id: &str) -> StoreResult<DirectoryGroup> {
        self.collection
            .list_all()
            .await?
            .into_iter()
            .find(|g| g.name == name && g.id == guild_id)
            .ok_or_else(|| StoreError::not_found(DirectoryGroup::COLLECTION, name))
    }

    /// Every registered group.
    pub async fn list(&self) -> StoreResult<Vec<DirectoryGroup>> {
        self.collection.list_all().await
    }

    /// Remove a group by guild id.
    #[instrument(skip(self))]
    pub async fn remove(&self, guild_id: &str) -> StoreResult<()> {
        self.collection.delete_by_id(guild_id).await?;
        debug!("Removed directory group");
        Ok(())
    }

    /// Whether a group exists for the guild.
    ///
    /// A failing store counts as "not registered".
    pub async fn is_registered(&self, guild_id: &str) -> bool {
        self.collection.get_by_id(guild_id).await.is_ok()
    }

    /// Add a role id to a group. Adding a present id is a no-op.
    #[instrument(skip(self))]
    pub async fn add_role(&self, guild_id: &str, role_id: &str) -> StoreResult<()> {
        self.update(guild_id, |g| g.add_role(role_id)).await
    }

    /// Remove a role id from a group by exact match.
    #[instrument(skip(self))]
    pub async fn remove_role(&self, guild_id: &str, role_id: &str) -> StoreResult<()> {
        self.update(guild_id, |g| g.remove_role(role_id)).await
    }

    /// Add a member id to a group. Adding a present id is a no-op.
    #[instrument(skip(self))]
    pub async fn add_member(&self, guild_id: &str, member_id: &str) -> StoreResult<()> {
        self.update(guild_id, |g| g.add_member(member_id)).await
    }

    /// Remove a member id from a group by exact match.
    #[instrument(skip(self))]
    pub async fn remove_member(&self, guild_id: &str, member_id: &str) -> StoreResult<()> {
        self.update(guild_id, |g| g.remove_member(member_id)).await
    }

    /// Set the cached id of a well-known role.
    #[instrument(skip(self))]
    pub async fn set_role_id(
        &self,
        guild_id: &str,
        role: WellKnownRole,
        role_id: &str,
    ) -> StoreResult<()> {
        self.update(guild_id, |g| g.set_role(role, role_id)).await
    }

    /// Cached id of a well-known role.
    pub async fn role_id(&self, guild_id: &str, role: WellKnownRole) -> StoreResult<String> {
        Ok(self.get(guild_id).await?.role(role).to_string())
    }

    /// Load, mutate, and save only if the mutation reports a change.
    async fn update(
        &self,
        guild_id: &str,
        mutate: impl FnOnce(&mut DirectoryGroup) -> bool,
    ) -> StoreResult<()> {
        let mut group = self.get(guild_id).await?;
        if mutate(&mut group) {
            self.save(&group).await?;
        }
        Ok(())
    }
}

/// Repository for [`NavigationNode`] records.
#[derive(Clone)]
pub struct NodeRepository {
    collection: Arc<dyn Collection<NavigationNode>>,
}

impl NodeRepository {
    /// Wraps a collection.
    pub fn new(collection: Arc<dyn Collection<NavigationNode>>) -> Self {
        Self { collection }
    }

    /// Create or replace a node.
    pub async fn save(&self, node: &NavigationNode) -> StoreResult<()> {
        self.collection.save(node).await
    }

    /// Node by id.
    pub async fn get(&self, id: &str) -> StoreResult<NavigationNode> {
        self.collection.get_by_id(id).await
    }

    /// Every node, across all guilds.
    pub async fn list(&self) -> StoreResult<Vec<NavigationNode>> {
        self.collection.list_all().await
    }

    /// Nodes belonging to one guild.
    pub async fn list_for_guild(&self, guild_id: &str) -> StoreResult<Vec<NavigationNode>> {
        Ok(self
            .collection
            .list_all()
            .await?
            .into_iter()
            .filter(|n| n.guild_id == guild_id)
            .collect())
    }

    /// Remove a node by id.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        self.collection.delete_by_id(id).await?;
        debug!("Removed navigation node");
        Ok(())
    }

    /// Node currently bound to a remote channel, if any.
    pub async fn find_bound_to(&self, channel_id: &str) -> StoreResult<Option<NavigationNode>> {
        match self.collection.get_by_id(channel_id).await {
            Ok(node) => Ok(Some(node)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Move a node to a new primary key.
    ///
    /// Saves the node under `new_id`, then removes the record under its old
    /// id. Returns the rebound node.
    #[instrument(skip(self, node), fields(old_id = %node.id, name = %node.name))]
    pub async fn rebind(&self, node: &NavigationNode, new_id: &str) -> StoreResult<NavigationNode> {
        let mut rebound = node.clone();
        rebound.id = new_id.to_string();
        self.collection.save(&rebound).await?;
        if node.id != new_id {
            match self.collection.delete_by_id(&node.id).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        debug!("Rebound navigation node");
        Ok(rebound)
    }
}
