//! In-memory directory for tests and dry runs.

use crate::DirectoryClient;
use async_trait::async_trait;
use guildmirror_core::{
    ChannelEdit, ChannelKind, RemoteChannel, RemoteGuild, RemoteMember, RemoteRole,
};
use guildmirror_error::{DirectoryError, DirectoryErrorKind, DirectoryResult};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;
use tracing::debug;

/// A write that changed the directory's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A channel was created.
    CreateChannel {
        /// Owning guild
        guild_id: String,
        /// Id assigned to the channel
        channel_id: String,
        /// Channel name
        name: String,
        /// Channel type
        kind: ChannelKind,
    },
    /// A channel was renamed or moved.
    EditChannel {
        /// Edited channel
        channel_id: String,
        /// Name after the edit
        name: String,
        /// Parent after the edit
        parent_id: String,
    },
    /// A role was newly allowed to view a channel.
    AllowRoleView {
        /// Channel
        channel_id: String,
        /// Role
        role_id: String,
    },
}

#[derive(Debug, Default)]
struct GuildState {
    guild: RemoteGuild,
    roles: Vec<RemoteRole>,
}

#[derive(Debug)]
struct State {
    guilds: BTreeMap<String, GuildState>,
    view_grants: BTreeMap<String, BTreeSet<String>>,
    failures: BTreeMap<String, DirectoryErrorKind>,
    mutations: Vec<Mutation>,
    calls: usize,
    next_id: u64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            guilds: BTreeMap::new(),
            view_grants: BTreeMap::new(),
            failures: BTreeMap::new(),
            mutations: Vec::new(),
            calls: 0,
            next_id: 900_000,
        }
    }
}

impl State {
    /// Count a call and fail it if a failure was injected for `id`.
    #[track_caller]
    fn enter(&mut self, id: &str) -> DirectoryResult<()> {
        self.calls += 1;
        match self.failures.get(id) {
            Some(kind) => Err(DirectoryError::new(kind.clone())),
            None => Ok(()),
        }
    }

    #[track_caller]
    fn guild(&self, guild_id: &str) -> DirectoryResult<&GuildState> {
        self.guilds.get(guild_id).ok_or_else(|| {
            DirectoryError::new(DirectoryErrorKind::NotFound(format!("guild {}", guild_id)))
        })
    }

    #[track_caller]
    fn guild_mut(&mut self, guild_id: &str) -> DirectoryResult<&mut GuildState> {
        self.guilds.get_mut(guild_id).ok_or_else(|| {
            DirectoryError::new(DirectoryErrorKind::NotFound(format!("guild {}", guild_id)))
        })
    }

    fn channel(&self, channel_id: &str) -> Option<&RemoteChannel> {
        self.guilds
            .values()
            .flat_map(|g| g.guild.channels.iter())
            .find(|c| c.id == channel_id)
    }

    fn channel_mut(&mut self, channel_id: &str) -> Option<&mut RemoteChannel> {
        self.guilds
            .values_mut()
            .flat_map(|g| g.guild.channels.iter_mut())
            .find(|c| c.id == channel_id)
    }

    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

/// Deterministic stand-in for the remote directory.
///
/// Holds guilds, roles, channels and members in memory, records every
/// state-changing write as a [`Mutation`], and can be told to fail calls
/// naming a given id. Writes that change nothing (re-granting a permission,
/// an edit to identical values) are not recorded.
///
/// # Example
///
/// ```
/// use guildmirror_core::{ChannelKind, RemoteChannel, RemoteGuild};
/// use guildmirror_directory::{DirectoryClient, InMemoryDirectory};
///
/// # #[tokio::main]
/// # async fn main() {
/// let directory = InMemoryDirectory::new();
/// directory
///     .add_guild(RemoteGuild { id: "1".into(), name: "Keep".into(), ..Default::default() })
///     .await;
/// directory
///     .add_channel("1", RemoteChannel::new("10", "hall", ChannelKind::Text))
///     .await;
///
/// assert_eq!(directory.get_channel("10").await.unwrap().name, "hall");
/// assert!(directory.get_channel("11").await.unwrap_err().is_unknown_channel());
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: Mutex<State>,
}

impl InMemoryDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a guild. Its channels and members come with it.
    pub async fn add_guild(&self, guild: RemoteGuild) {
        let mut state = self.state.lock().await;
        let roles = state
            .guilds
            .remove(&guild.id)
            .map(|g| g.roles)
            .unwrap_or_default();
        state
            .guilds
            .insert(guild.id.clone(), GuildState { guild, roles });
    }

    /// Add a role to a guild. Unknown guilds are ignored.
    pub async fn add_role(&self, guild_id: &str, role: RemoteRole) {
        let mut state = self.state.lock().await;
        if let Some(guild) = state.guilds.get_mut(guild_id) {
            guild.roles.push(role);
        }
    }

    /// Add a channel to a guild. Unknown guilds are ignored.
    pub async fn add_channel(&self, guild_id: &str, channel: RemoteChannel) {
        let mut state = self.state.lock().await;
        if let Some(guild) = state.guilds.get_mut(guild_id) {
            guild.guild.channels.push(channel);
        }
    }

    /// Add a member to a guild. Unknown guilds are ignored.
    pub async fn add_member(&self, guild_id: &str, user_id: &str) {
        let mut state = self.state.lock().await;
        if let Some(guild) = state.guilds.get_mut(guild_id) {
            guild.guild.members.push(RemoteMember {
                user_id: user_id.to_string(),
            });
        }
    }

    /// Delete a channel out from under the mirror. Returns whether it existed.
    pub async fn remove_channel(&self, channel_id: &str) -> bool {
        let mut state = self.state.lock().await;
        let mut removed = false;
        for guild in state.guilds.values_mut() {
            let before = guild.guild.channels.len();
            guild.guild.channels.retain(|c| c.id != channel_id);
            removed |= guild.guild.channels.len() != before;
        }
        state.view_grants.remove(channel_id);
        removed
    }

    /// Make every call naming `id` (a guild or channel id) fail with `kind`.
    pub async fn fail_with(&self, id: &str, kind: DirectoryErrorKind) {
        self.state
            .lock()
            .await
            .failures
            .insert(id.to_string(), kind);
    }

    /// Stop failing calls naming `id`.
    pub async fn clear_failure(&self, id: &str) {
        self.state.lock().await.failures.remove(id);
    }

    /// Recorded writes, oldest first.
    pub async fn mutations(&self) -> Vec<Mutation> {
        self.state.lock().await.mutations.clone()
    }

    /// Forget recorded writes.
    pub async fn clear_mutations(&self) {
        self.state.lock().await.mutations.clear();
    }

    /// Number of client calls served (including failed ones).
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls
    }

    /// Current state of a channel, bypassing failure injection.
    pub async fn channel(&self, channel_id: &str) -> Option<RemoteChannel> {
        self.state.lock().await.channel(channel_id).cloned()
    }

    /// Channels of a guild, bypassing failure injection.
    pub async fn channels(&self, guild_id: &str) -> Vec<RemoteChannel> {
        self.state
            .lock()
            .await
            .guilds
            .get(guild_id)
            .map(|g| g.guild.channels.clone())
            .unwrap_or_default()
    }

    /// Roles allowed to view a channel.
    pub async fn view_grants(&self, channel_id: &str) -> Vec<String> {
        self.state
            .lock()
            .await
            .view_grants
            .get(channel_id)
            .map(|roles| roles.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DirectoryClient for InMemoryDirectory {
    async fn get_guild(&self, guild_id: &str) -> DirectoryResult<RemoteGuild> {
        let mut state = self.state.lock().await;
        state.enter(guild_id)?;
        Ok(state.guild(guild_id)?.guild.clone())
    }

    async fn list_roles(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteRole>> {
        let mut state = self.state.lock().await;
        state.enter(guild_id)?;
        Ok(state.guild(guild_id)?.roles.clone())
    }

    async fn list_channels(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteChannel>> {
        let mut state = self.state.lock().await;
        state.enter(guild_id)?;
        Ok(state.guild(guild_id)?.guild.channels.clone())
    }

    async fn get_channel(&self, channel_id: &str) -> DirectoryResult<RemoteChannel> {
        let mut state = self.state.lock().await;
        state.enter(channel_id)?;
        state.channel(channel_id).cloned().ok_or_else(|| {
            DirectoryError::new(DirectoryErrorKind::UnknownChannel(channel_id.to_string()))
        })
    }

    async fn create_channel(
        &self,
        guild_id: &str,
        name: &str,
        kind: ChannelKind,
    ) -> DirectoryResult<RemoteChannel> {
        let mut state = self.state.lock().await;
        state.enter(guild_id)?;
        state.guild(guild_id)?;

        let channel = RemoteChannel::new(state.next_id(), name, kind);
        state
            .guild_mut(guild_id)?
            .guild
            .channels
            .push(channel.clone());
        state.mutations.push(Mutation::CreateChannel {
            guild_id: guild_id.to_string(),
            channel_id: channel.id.clone(),
            name: name.to_string(),
            kind,
        });
        debug!(guild_id, channel_id = %channel.id, name, "Created channel");
        Ok(channel)
    }

    async fn edit_channel(
        &self,
        channel_id: &str,
        edit: &ChannelEdit,
    ) -> DirectoryResult<RemoteChannel> {
        let mut state = self.state.lock().await;
        state.enter(channel_id)?;

        let channel = state.channel_mut(channel_id).ok_or_else(|| {
            DirectoryError::new(DirectoryErrorKind::UnknownChannel(channel_id.to_string()))
        })?;
        let changed = channel.name != edit.name || channel.parent_id != edit.parent_id;
        channel.name = edit.name.clone();
        channel.parent_id = edit.parent_id.clone();
        let channel = channel.clone();

        if changed {
            state.mutations.push(Mutation::EditChannel {
                channel_id: channel_id.to_string(),
                name: edit.name.clone(),
                parent_id: edit.parent_id.clone(),
            });
        }
        Ok(channel)
    }

    async fn allow_role_view(&self, channel_id: &str, role_id: &str) -> DirectoryResult<()> {
        let mut state = self.state.lock().await;
        state.enter(channel_id)?;
        if state.channel(channel_id).is_none() {
            return Err(DirectoryError::new(DirectoryErrorKind::UnknownChannel(
                channel_id.to_string(),
            )));
        }

        let granted = state
            .view_grants
            .entry(channel_id.to_string())
            .or_default()
            .insert(role_id.to_string());
        if granted {
            state.mutations.push(Mutation::AllowRoleView {
                channel_id: channel_id.to_string(),
                role_id: role_id.to_string(),
            });
        }
        Ok(())
    }
}
