//! Hooks into the rest of the bot that a repair pass calls out to.

use async_trait::async_trait;
use guildmirror_core::{MemberPlacement, NavigationNode};
use guildmirror_directory::DirectoryClient;
use guildmirror_error::MirrorResult;
use std::sync::Arc;
use tracing::debug;

/// Applies a node's default permissions to its channel.
///
/// Called for every node that is healthy or was just repaired.
#[async_trait]
pub trait PermissionSync: Send + Sync {
    /// Bring the channel bound to `node` in line with the node's permissions.
    async fn sync_node(&self, node: &NavigationNode) -> MirrorResult<()>;
}

/// Lets the node's role view its channel.
#[derive(Clone)]
pub struct DirectoryPermissionSync {
    directory: Arc<dyn DirectoryClient>,
}

impl DirectoryPermissionSync {
    /// Permission sync through `directory`.
    pub fn new(directory: Arc<dyn DirectoryClient>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl PermissionSync for DirectoryPermissionSync {
    async fn sync_node(&self, node: &NavigationNode) -> MirrorResult<()> {
        if node.role_id.is_empty() {
            return Ok(());
        }
        debug!(node_id = %node.id, role_id = %node.role_id, "Granting view permission");
        self.directory
            .allow_role_view(&node.id, &node.role_id)
            .await?;
        Ok(())
    }
}

/// Leaves permissions alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPermissionSync;

#[async_trait]
impl PermissionSync for NoPermissionSync {
    async fn sync_node(&self, _node: &NavigationNode) -> MirrorResult<()> {
        Ok(())
    }
}

/// Re-seats members in the rooms they occupy after channels were repaired.
#[async_trait]
pub trait MemberRepair: Send + Sync {
    /// Where the known members of a guild currently are.
    async fn placements(&self, guild_id: &str) -> MirrorResult<Vec<MemberPlacement>>;

    /// Restore a member's access to the room they occupy.
    async fn repair_member(&self, placement: &MemberPlacement) -> MirrorResult<()>;
}

/// Knows of no members.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMemberRepair;

#[async_trait]
impl MemberRepair for NoMemberRepair {
    async fn placements(&self, _guild_id: &str) -> MirrorResult<Vec<MemberPlacement>> {
        Ok(Vec::new())
    }

    async fn repair_member(&self, _placement: &MemberPlacement) -> MirrorResult<()> {
        Ok(())
    }
}
