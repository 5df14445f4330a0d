//! The remote directory interface.

use async_trait::async_trait;
use guildmirror_core::{ChannelEdit, ChannelKind, RemoteChannel, RemoteGuild, RemoteRole};
use guildmirror_error::DirectoryResult;

/// Read and write access to the authoritative remote directory.
///
/// Implementations report a deleted channel as
/// [`DirectoryErrorKind::UnknownChannel`](guildmirror_error::DirectoryErrorKind::UnknownChannel)
/// and an unknown guild as
/// [`DirectoryErrorKind::NotFound`](guildmirror_error::DirectoryErrorKind::NotFound).
/// The repair engine keys its decisions on those two conditions.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Snapshot of a guild including its members and channels.
    async fn get_guild(&self, guild_id: &str) -> DirectoryResult<RemoteGuild>;

    /// All roles of a guild, including the implicit everyone role.
    async fn list_roles(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteRole>>;

    /// All channels of a guild, categories included.
    async fn list_channels(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteChannel>>;

    /// A single channel.
    async fn get_channel(&self, channel_id: &str) -> DirectoryResult<RemoteChannel>;

    /// Create a channel in a guild.
    async fn create_channel(
        &self,
        guild_id: &str,
        name: &str,
        kind: ChannelKind,
    ) -> DirectoryResult<RemoteChannel>;

    /// Rename a channel and move it under a category.
    async fn edit_channel(
        &self,
        channel_id: &str,
        edit: &ChannelEdit,
    ) -> DirectoryResult<RemoteChannel>;

    /// Grant a role permission to view a channel.
    async fn allow_role_view(&self, channel_id: &str, role_id: &str) -> DirectoryResult<()>;
}

#[async_trait]
impl<D: DirectoryClient + ?Sized> DirectoryClient for std::sync::Arc<D> {
    async fn get_guild(&self, guild_id: &str) -> DirectoryResult<RemoteGuild> {
        (**self).get_guild(guild_id).await
    }

    async fn list_roles(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteRole>> {
        (**self).list_roles(guild_id).await
    }

    async fn list_channels(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteChannel>> {
        (**self).list_channels(guild_id).await
    }

    async fn get_channel(&self, channel_id: &str) -> DirectoryResult<RemoteChannel> {
        (**self).get_channel(channel_id).await
    }

    async fn create_channel(
        &self,
        guild_id: &str,
        name: &str,
        kind: ChannelKind,
    ) -> DirectoryResult<RemoteChannel> {
        (**self).create_channel(guild_id, name, kind).await
    }

    async fn edit_channel(
        &self,
        channel_id: &str,
        edit: &ChannelEdit,
    ) -> DirectoryResult<RemoteChannel> {
        (**self).edit_channel(channel_id, edit).await
    }

    async fn allow_role_view(&self, channel_id: &str, role_id: &str) -> DirectoryResult<()> {
        (**self).allow_role_view(channel_id, role_id).await
    }
}
