//! Serializes repair passes and runs them per guild.
//!
//! A coordinator runs at most one pass at a time, whether for one guild or
//! the whole deployment. A second request while a pass is running fails
//! with `AlreadyInProgress` instead of queueing. Within a pass each guild
//! is also held under its own lock, which `register_tenant` and
//! `remove_tenant` respect.
//!
//! A guild's pass runs these steps in order:
//!
//! 1. overwrite the group's descriptive fields and well-known role ids
//! 2. repair navigation nodes
//! 3. add remote roles and members to the group (never removing any)
//! 4. repair members placed in the guild's live channels

use crate::{
    DirectoryPermissionSync, DriftRepairer, MemberRepair, NoMemberRepair, PermissionSync,
    RepairReport, RoleResolver, summary,
};
use guildmirror_core::{DirectoryGroup, MirrorConfig, RemoteGuild, RepairConfig, RolesConfig};
use guildmirror_directory::DirectoryClient;
use guildmirror_error::{MirrorError, MirrorResult, SyncError, SyncErrorKind};
use guildmirror_rate_limit::{FixedPacer, NoPacing, PaceStep, Pacer};
use guildmirror_store::EntityStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use strum::IntoEnumIterator;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{error, info, instrument};

/// Result of a completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct SyncOutcome {
    /// Wall time of the pass, pacing included
    duration: Duration,
    /// Node repairs across every guild in the pass
    report: RepairReport,
}

/// Holds the coordinator's running flag until dropped.
struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    #[track_caller]
    fn acquire(running: &'a AtomicBool) -> Result<Self, SyncError> {
        running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SyncError::new(SyncErrorKind::AlreadyInProgress))?;
        Ok(Self { running })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Entry point for syncing guilds against the directory.
///
/// # Example
///
/// ```
/// use guildmirror_core::{RemoteGuild, RemoteRole};
/// use guildmirror_directory::InMemoryDirectory;
/// use guildmirror_store::EntityStore;
/// use guildmirror_sync::SyncCoordinator;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let directory = Arc::new(InMemoryDirectory::new());
/// directory
///     .add_guild(RemoteGuild { id: "1".into(), name: "Keep".into(), ..Default::default() })
///     .await;
/// for (id, name) in [("1", "@everyone"), ("2", "Admin"), ("3", "Moderator"), ("4", "Builder")] {
///     directory.add_role("1", RemoteRole::new(id, name)).await;
/// }
///
/// let coordinator = SyncCoordinator::builder(directory, EntityStore::in_memory()).build();
/// coordinator.sync_tenant("1").await?;
/// assert!(coordinator.is_tenant_registered("1").await);
/// # Ok(())
/// # }
/// ```
pub struct SyncCoordinator {
    directory: Arc<dyn DirectoryClient>,
    store: EntityStore,
    roles: RoleResolver,
    repairer: DriftRepairer,
    members: Arc<dyn MemberRepair>,
    pacer: Arc<dyn Pacer>,
    running: AtomicBool,
    tenant_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SyncCoordinator {
    /// Start building a coordinator with no pacing, no member repair and
    /// permission sync through `directory`.
    pub fn builder(
        directory: Arc<dyn DirectoryClient>,
        store: EntityStore,
    ) -> SyncCoordinatorBuilder {
        SyncCoordinatorBuilder::new(directory, store)
    }

    /// Coordinator paced and labelled per configuration.
    pub fn from_config(
        config: &MirrorConfig,
        directory: Arc<dyn DirectoryClient>,
        store: EntityStore,
    ) -> Self {
        Self::builder(directory, store)
            .pacer(Arc::new(FixedPacer::new(config.pacing)))
            .roles(config.roles.clone())
            .repair(config.repair.clone())
            .build()
    }

    /// Whether a pass is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Repair one guild, registering it first if it is new.
    ///
    /// # Errors
    ///
    /// `AlreadyInProgress` if any pass is running; otherwise a `Fatal` sync
    /// error naming the step that failed. `is_not_found` and `is_transient`
    /// on the error report the class of the underlying failure. Work done
    /// before the failure is kept.
    #[instrument(skip(self))]
    pub async fn sync_tenant(&self, guild_id: &str) -> MirrorResult<SyncOutcome> {
        let _guard = RunGuard::acquire(&self.running)?;
        let started = Instant::now();
        info!("Guild sync started");

        let report = self.run_tenant(guild_id).await.inspect_err(|e| {
            error!(error = %e, "Guild sync aborted");
        })?;

        let outcome = SyncOutcome {
            duration: started.elapsed(),
            report,
        };
        info!(duration_ms = outcome.duration.as_millis() as u64, %report, "Guild sync finished");
        Ok(outcome)
    }

    /// Repair every registered guild in listing order, pausing between
    /// guilds. Stops at the first guild that fails.
    ///
    /// # Errors
    ///
    /// `AlreadyInProgress` if any pass is running, a store error if guilds
    /// cannot be listed, or the first guild's `Fatal` error.
    #[instrument(skip(self))]
    pub async fn sync_deployment(&self) -> MirrorResult<SyncOutcome> {
        let _guard = RunGuard::acquire(&self.running)?;
        let started = Instant::now();
        let groups = self.store.groups().list().await?;
        info!(guilds = groups.len(), "Deployment sync started");

        let mut report = RepairReport::default();
        for (index, group) in groups.iter().enumerate() {
            if index > 0 {
                self.pacer.pause(PaceStep::Guild).await;
            }
            let guild_report = self.run_tenant(&group.id).await.inspect_err(|e| {
                error!(guild_id = %group.id, error = %e, "Deployment sync aborted");
            })?;
            report.merge(&guild_report);
        }

        let outcome = SyncOutcome {
            duration: started.elapsed(),
            report,
        };
        info!(duration_ms = outcome.duration.as_millis() as u64, %report, "Deployment sync finished");
        Ok(outcome)
    }

    /// Create the guild's record from the directory unless it exists.
    ///
    /// Resolves the four well-known roles and seeds roles and members.
    /// Returns the stored record.
    #[instrument(skip(self))]
    pub async fn register_tenant(&self, guild_id: &str) -> MirrorResult<DirectoryGroup> {
        let lock = self.tenant_lock(guild_id).await;
        let _held = lock.lock().await;

        match self.store.groups().get(guild_id).await {
            Ok(group) => Ok(group),
            Err(e) if e.is_not_found() => Ok(self.register(guild_id).await?.0),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the guild has a record.
    pub async fn is_tenant_registered(&self, guild_id: &str) -> bool {
        self.store.groups().is_registered(guild_id).await
    }

    /// Code-block summary of one guild.
    pub async fn tenant_summary(&self, guild_id: &str) -> MirrorResult<String> {
        let group = self.store.groups().get(guild_id).await?;
        Ok(summary::tenant_summary(&group))
    }

    /// Code-block list of every registered guild.
    pub async fn deployment_summary(&self) -> MirrorResult<String> {
        let groups = self.store.groups().list().await?;
        Ok(summary::deployment_summary(&groups))
    }

    /// Delete a guild's record. Its nodes are left alone.
    ///
    /// The guild's lock is dropped too unless another caller is waiting on it.
    #[instrument(skip(self))]
    pub async fn remove_tenant(&self, guild_id: &str) -> MirrorResult<()> {
        let lock = self.tenant_lock(guild_id).await;
        let held = lock.lock().await;
        self.store.groups().remove(guild_id).await?;
        drop(held);
        self.evict_tenant_lock(guild_id, lock).await;
        info!("Guild record removed");
        Ok(())
    }

    /// Number of guilds with a lock entry.
    pub async fn tenant_lock_count(&self) -> usize {
        self.tenant_locks.lock().await.len()
    }

    async fn tenant_lock(&self, guild_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.tenant_locks.lock().await;
        Arc::clone(locks.entry(guild_id.to_string()).or_default())
    }

    /// Clones are only handed out under the map lock, so a count of two
    /// (the map and `lock`) means nobody else holds or awaits it.
    async fn evict_tenant_lock(&self, guild_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.tenant_locks.lock().await;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(guild_id);
        }
    }

    /// One guild's pass under its tenant lock.
    async fn run_tenant(&self, guild_id: &str) -> MirrorResult<RepairReport> {
        let lock = self.tenant_lock(guild_id).await;
        let _held = lock.lock().await;

        let (mut group, remote) = match self.store.groups().get(guild_id).await {
            Ok(group) => {
                let remote = self.fetch(guild_id).await?;
                let group = self.reconcile_group(group, &remote).await?;
                (group, remote)
            }
            Err(e) if e.is_not_found() => self
                .register(guild_id)
                .await
                .map_err(|e| fatal(guild_id, "registering guild", e))?,
            Err(e) => return Err(fatal(guild_id, "loading guild record", e)),
        };

        let report = self.repairer.repair_nodes(guild_id).await?;
        self.sync_roles_and_members(&mut group, &remote).await?;
        self.repair_members(guild_id).await?;
        Ok(report)
    }

    async fn fetch(&self, guild_id: &str) -> MirrorResult<RemoteGuild> {
        self.directory
            .get_guild(guild_id)
            .await
            .map_err(|e| fatal(guild_id, "fetching guild", e))
    }

    /// First observation of a guild.
    async fn register(&self, guild_id: &str) -> MirrorResult<(DirectoryGroup, RemoteGuild)> {
        let remote = self.directory.get_guild(guild_id).await?;
        let mut group = DirectoryGroup::new(guild_id);
        group.apply_remote(&remote);
        self.resolve_roles(&mut group).await?;
        for role in self.directory.list_roles(guild_id).await? {
            group.add_role(role.id);
        }
        for member in &remote.members {
            group.add_member(member.user_id.clone());
        }
        self.store.groups().save(&group).await?;
        info!(guild_id, name = %group.name, "Guild registered");
        Ok((group, remote))
    }

    /// Overwrite remote-sourced fields and cached role ids.
    async fn reconcile_group(
        &self,
        mut group: DirectoryGroup,
        remote: &RemoteGuild,
    ) -> MirrorResult<DirectoryGroup> {
        let guild_id = group.id.clone();
        let mut changed = group.apply_remote(remote);
        changed |= self
            .resolve_roles(&mut group)
            .await
            .map_err(|e| fatal(&guild_id, "resolving well-known roles", e))?;
        if changed {
            self.store
                .groups()
                .save(&group)
                .await
                .map_err(|e| fatal(&guild_id, "saving guild record", e))?;
        }
        Ok(group)
    }

    async fn resolve_roles(&self, group: &mut DirectoryGroup) -> MirrorResult<bool> {
        let mut changed = false;
        for role in guildmirror_core::WellKnownRole::iter() {
            self.pacer.pause(PaceStep::Role).await;
            let role_id = self.roles.resolve_well_known(&group.id, role).await?;
            changed |= group.set_role(role, role_id);
        }
        Ok(changed)
    }

    /// Add remote roles and members; nothing is removed.
    async fn sync_roles_and_members(
        &self,
        group: &mut DirectoryGroup,
        remote: &RemoteGuild,
    ) -> MirrorResult<()> {
        let roles = self
            .directory
            .list_roles(&group.id)
            .await
            .map_err(|e| fatal(&group.id, "listing roles", e))?;

        let mut changed = false;
        for role in roles {
            changed |= group.add_role(role.id);
        }
        for member in &remote.members {
            changed |= group.add_member(member.user_id.clone());
        }

        if changed {
            self.store
                .groups()
                .save(group)
                .await
                .map_err(|e| fatal(&group.id, "saving roles and members", e))?;
        }
        Ok(())
    }

    /// Repair members sitting in live channels of the guild.
    async fn repair_members(&self, guild_id: &str) -> MirrorResult<()> {
        let placements: Vec<_> = self
            .members
            .placements(guild_id)
            .await
            .map_err(|e| fatal(guild_id, "listing member placements", e))?
            .into_iter()
            .filter(|p| p.guild_id == guild_id && p.is_placed())
            .collect();
        if placements.is_empty() {
            return Ok(());
        }

        let channels = self
            .directory
            .list_channels(guild_id)
            .await
            .map_err(|e| fatal(guild_id, "listing channels", e))?;

        for placement in placements
            .iter()
            .filter(|p| channels.iter().any(|c| c.id == p.room_id))
        {
            self.pacer.pause(PaceStep::Member).await;
            self.members.repair_member(placement).await.map_err(|e| {
                fatal(
                    guild_id,
                    format!("repairing member {}", placement.member_id),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[track_caller]
fn fatal(guild_id: &str, context: impl Into<String>, cause: impl Into<MirrorError>) -> MirrorError {
    SyncError::fatal(guild_id, context, cause).into()
}

/// Builder for [`SyncCoordinator`].
pub struct SyncCoordinatorBuilder {
    directory: Arc<dyn DirectoryClient>,
    store: EntityStore,
    pacer: Arc<dyn Pacer>,
    permissions: Option<Arc<dyn PermissionSync>>,
    members: Arc<dyn MemberRepair>,
    roles: RolesConfig,
    repair: RepairConfig,
}

impl SyncCoordinatorBuilder {
    fn new(directory: Arc<dyn DirectoryClient>, store: EntityStore) -> Self {
        Self {
            directory,
            store,
            pacer: Arc::new(NoPacing),
            permissions: None,
            members: Arc::new(NoMemberRepair),
            roles: RolesConfig::default(),
            repair: RepairConfig::default(),
        }
    }

    /// Delays between steps.
    pub fn pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Permission sync run on healthy and repaired nodes.
    pub fn permissions(mut self, permissions: Arc<dyn PermissionSync>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Member repair run at the end of each guild's pass.
    pub fn members(mut self, members: Arc<dyn MemberRepair>) -> Self {
        self.members = members;
        self
    }

    /// Well-known role labels.
    pub fn roles(mut self, roles: RolesConfig) -> Self {
        self.roles = roles;
        self
    }

    /// Repair policy.
    pub fn repair(mut self, repair: RepairConfig) -> Self {
        self.repair = repair;
        self
    }

    /// Finish the coordinator. It starts idle.
    pub fn build(self) -> SyncCoordinator {
        let permissions = self
            .permissions
            .unwrap_or_else(|| Arc::new(DirectoryPermissionSync::new(Arc::clone(&self.directory))));
        let repairer = DriftRepairer::new(
            Arc::clone(&self.directory),
            self.store.clone(),
            permissions,
            Arc::clone(&self.pacer),
            self.repair.default_category,
        );

        SyncCoordinator {
            roles: RoleResolver::new(Arc::clone(&self.directory), self.roles),
            directory: self.directory,
            store: self.store,
            repairer,
            members: self.members,
            pacer: self.pacer,
            running: AtomicBool::new(false),
            tenant_locks: Mutex::new(HashMap::new()),
        }
    }
}
