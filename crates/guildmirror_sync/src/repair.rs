//! Drift detection and node repair.
//!
//! Each navigation node of a guild is probed against the directory. A node
//! whose channel is gone is classified into a [`RepairPlan`] from a fresh
//! channel listing and the store, and the plan is then carried out:
//!
//! | Live channel with the node's name | Node already bound to it | Plan |
//! |---|---|---|
//! | yes | another node | [`RepairPlan::DeleteDuplicate`] |
//! | yes | none | [`RepairPlan::Rebind`] |
//! | no | n/a | [`RepairPlan::Recreate`] |
//!
//! Category channels never match a node name.

use crate::PermissionSync;
use guildmirror_core::{ChannelEdit, ChannelKind, NavigationNode, RemoteChannel};
use guildmirror_directory::DirectoryClient;
use guildmirror_error::{MirrorResult, SyncError, SyncResult};
use guildmirror_rate_limit::{PaceStep, Pacer};
use guildmirror_store::EntityStore;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// What to do with a node whose channel no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RepairPlan {
    /// Another node is already bound to the live channel; drop this one.
    #[display("delete duplicate of {canonical_id}")]
    DeleteDuplicate {
        /// Node that stays bound to the channel
        canonical_id: String,
    },
    /// The channel was recreated or renamed; point the node at it.
    #[display("rebind to {channel_id}")]
    Rebind {
        /// Live channel carrying the node's name
        channel_id: String,
    },
    /// No channel carries the node's name; create one.
    #[display("recreate")]
    Recreate,
}

impl RepairPlan {
    /// Decide how to repair `node`.
    ///
    /// `matched` is the live channel carrying the node's name, if any, and
    /// `bound` the node currently stored under that channel's id.
    pub fn classify(
        node: &NavigationNode,
        matched: Option<&RemoteChannel>,
        bound: Option<&NavigationNode>,
    ) -> Self {
        match (matched, bound) {
            (None, _) => RepairPlan::Recreate,
            (Some(_), Some(canonical)) if canonical.id != node.id => {
                RepairPlan::DeleteDuplicate {
                    canonical_id: canonical.id.clone(),
                }
            }
            (Some(channel), _) => RepairPlan::Rebind {
                channel_id: channel.id.clone(),
            },
        }
    }
}

/// The live, non-category channel named exactly `name`.
pub fn matching_channel<'a>(channels: &'a [RemoteChannel], name: &str) -> Option<&'a RemoteChannel> {
    channels
        .iter()
        .find(|c| c.kind != ChannelKind::Category && c.name == name)
}

/// The category named exactly `name`.
pub fn find_category<'a>(channels: &'a [RemoteChannel], name: &str) -> Option<&'a RemoteChannel> {
    channels
        .iter()
        .find(|c| c.kind == ChannelKind::Category && c.name == name)
}

/// What happened to one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum NodeOutcome {
    /// The channel existed.
    #[display("healthy")]
    Healthy,
    /// The node now points at another live channel.
    #[display("rebound")]
    Rebound,
    /// A new channel was created for the node.
    #[display("recreated")]
    Recreated,
    /// The node duplicated another and was deleted.
    #[display("duplicate removed")]
    DuplicateRemoved,
}

/// Tally of node outcomes over one or more passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display)]
#[display("{healthy} healthy, {rebound} rebound, {recreated} recreated, {duplicates_removed} duplicates removed")]
pub struct RepairReport {
    /// Nodes whose channel existed
    pub healthy: usize,
    /// Nodes pointed at a renamed or recreated channel
    pub rebound: usize,
    /// Nodes for which a channel was created
    pub recreated: usize,
    /// Duplicate nodes deleted
    pub duplicates_removed: usize,
}

impl RepairReport {
    /// Count one outcome.
    pub fn record(&mut self, outcome: NodeOutcome) {
        match outcome {
            NodeOutcome::Healthy => self.healthy += 1,
            NodeOutcome::Rebound => self.rebound += 1,
            NodeOutcome::Recreated => self.recreated += 1,
            NodeOutcome::DuplicateRemoved => self.duplicates_removed += 1,
        }
    }

    /// Add another report's counts to this one.
    pub fn merge(&mut self, other: &RepairReport) {
        self.healthy += other.healthy;
        self.rebound += other.rebound;
        self.recreated += other.recreated;
        self.duplicates_removed += other.duplicates_removed;
    }

    /// Nodes examined.
    pub fn total(&self) -> usize {
        self.healthy + self.rebound + self.recreated + self.duplicates_removed
    }

    /// Whether any node needed repair.
    pub fn repaired_any(&self) -> bool {
        self.total() != self.healthy
    }
}

/// Repairs the navigation nodes of a guild against the directory.
#[derive(Clone)]
pub struct DriftRepairer {
    directory: Arc<dyn DirectoryClient>,
    store: EntityStore,
    permissions: Arc<dyn PermissionSync>,
    pacer: Arc<dyn Pacer>,
    default_category: String,
}

impl DriftRepairer {
    /// Repairer writing through `directory` and `store`.
    pub fn new(
        directory: Arc<dyn DirectoryClient>,
        store: EntityStore,
        permissions: Arc<dyn PermissionSync>,
        pacer: Arc<dyn Pacer>,
        default_category: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            store,
            permissions,
            pacer,
            default_category: default_category.into(),
        }
    }

    /// Probe and repair every node of a guild, in listing order.
    ///
    /// Stops at the first node that cannot be repaired. Nodes handled
    /// before that keep their repairs.
    #[instrument(skip(self))]
    pub async fn repair_nodes(&self, guild_id: &str) -> SyncResult<RepairReport> {
        let nodes = self
            .store
            .nodes()
            .list_for_guild(guild_id)
            .await
            .map_err(|e| SyncError::fatal(guild_id, "listing nodes", e))?;

        let mut report = RepairReport::default();
        for node in nodes {
            self.pacer.pause(PaceStep::Node).await;
            let outcome = self.repair_node(&node).await.map_err(|e| {
                SyncError::fatal(
                    guild_id,
                    format!("repairing node {}: {}", node.id, node.name),
                    e,
                )
            })?;
            report.record(outcome);
        }

        info!(%report, "Node repair finished");
        Ok(report)
    }

    /// Probe one node and repair it if its channel is gone.
    #[instrument(skip(self, node), fields(node_id = %node.id, name = %node.name))]
    pub async fn repair_node(&self, node: &NavigationNode) -> MirrorResult<NodeOutcome> {
        match self.directory.get_channel(&node.id).await {
            Ok(_) => {
                debug!("Channel is live");
                self.permissions.sync_node(node).await?;
                Ok(NodeOutcome::Healthy)
            }
            Err(e) if e.is_unknown_channel() => {
                warn!("Node is dangling");
                let channels = self.directory.list_channels(&node.guild_id).await?;
                let plan = self.plan(node, &channels).await?;
                self.apply(node, plan, &channels).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn plan(
        &self,
        node: &NavigationNode,
        channels: &[RemoteChannel],
    ) -> MirrorResult<RepairPlan> {
        let matched = matching_channel(channels, &node.name);
        let bound = match matched {
            Some(channel) => self.store.nodes().find_bound_to(&channel.id).await?,
            None => None,
        };
        Ok(RepairPlan::classify(node, matched, bound.as_ref()))
    }

    async fn apply(
        &self,
        node: &NavigationNode,
        plan: RepairPlan,
        channels: &[RemoteChannel],
    ) -> MirrorResult<NodeOutcome> {
        info!(%plan, "Repairing node");
        match plan {
            RepairPlan::DeleteDuplicate { .. } => {
                self.store.nodes().remove(&node.id).await?;
                Ok(NodeOutcome::DuplicateRemoved)
            }
            RepairPlan::Rebind { channel_id } => {
                let rebound = self.store.nodes().rebind(node, &channel_id).await?;
                self.permissions.sync_node(&rebound).await?;
                Ok(NodeOutcome::Rebound)
            }
            RepairPlan::Recreate => {
                let created = self
                    .directory
                    .create_channel(&node.guild_id, &node.name, ChannelKind::Text)
                    .await?;

                match find_category(channels, &self.default_category) {
                    Some(category) => {
                        let edit = ChannelEdit {
                            name: node.name.clone(),
                            parent_id: category.id.clone(),
                        };
                        self.directory.edit_channel(&created.id, &edit).await?;
                    }
                    None => {
                        warn!(category = %self.default_category, "Default category missing, leaving channel at top level");
                    }
                }

                let rebound = self.store.nodes().rebind(node, &created.id).await?;
                self.permissions.sync_node(&rebound).await?;
                Ok(NodeOutcome::Recreated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hall(id: &str) -> NavigationNode {
        NavigationNode::new(id, "1", "hall")
    }

    #[test]
    fn classify_without_match_recreates() {
        assert_eq!(RepairPlan::classify(&hall("A"), None, None), RepairPlan::Recreate);
    }

    #[test]
    fn classify_unbound_match_rebinds() {
        let channel = RemoteChannel::new("B", "hall", ChannelKind::Text);
        assert_eq!(
            RepairPlan::classify(&hall("A"), Some(&channel), None),
            RepairPlan::Rebind {
                channel_id: "B".into()
            }
        );
    }

    #[test]
    fn classify_bound_match_deletes_duplicate() {
        let channel = RemoteChannel::new("B", "hall", ChannelKind::Text);
        assert_eq!(
            RepairPlan::classify(&hall("A"), Some(&channel), Some(&hall("B"))),
            RepairPlan::DeleteDuplicate {
                canonical_id: "B".into()
            }
        );
    }

    #[test]
    fn categories_never_match_nodes() {
        let channels = vec![
            RemoteChannel::new("C", "hall", ChannelKind::Category),
            RemoteChannel::new("T", "hall", ChannelKind::Voice),
        ];
        assert_eq!(matching_channel(&channels, "hall").map(|c| c.id.as_str()), Some("T"));
        assert_eq!(find_category(&channels, "hall").map(|c| c.id.as_str()), Some("C"));
    }

    #[test]
    fn report_tallies() {
        let mut report = RepairReport::default();
        report.record(NodeOutcome::Healthy);
        report.record(NodeOutcome::Rebound);
        let mut total = RepairReport::default();
        total.merge(&report);
        total.merge(&report);
        assert_eq!(total.total(), 4);
        assert!(total.repaired_any());
        assert_eq!(
            total.to_string(),
            "2 healthy, 2 rebound, 0 recreated, 0 duplicates removed"
        );
    }
}
