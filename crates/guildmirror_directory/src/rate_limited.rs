//! Request quota in front of any directory client.

use crate::DirectoryClient;
use async_trait::async_trait;
use guildmirror_core::{ChannelEdit, ChannelKind, RemoteChannel, RemoteGuild, RemoteRole};
use guildmirror_error::DirectoryResult;
use guildmirror_rate_limit::RequestLimiter;

/// Wraps a [`DirectoryClient`] so that every call first takes a cell from a
/// shared [`RequestLimiter`].
///
/// `get_guild` counts as a single call even though the REST client issues
/// several requests for it.
#[derive(Debug, Clone)]
pub struct RateLimited<D> {
    inner: D,
    limiter: RequestLimiter,
}

impl<D: DirectoryClient> RateLimited<D> {
    /// Wrap `inner` with a quota.
    pub fn new(inner: D, limiter: RequestLimiter) -> Self {
        Self { inner, limiter }
    }

    /// Wrap `inner` with a per-minute request limit; zero disables limiting.
    pub fn per_minute(inner: D, rpm: u32) -> Self {
        Self::new(inner, RequestLimiter::per_minute(rpm))
    }

    /// The wrapped client.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// The shared limiter.
    pub fn limiter(&self) -> &RequestLimiter {
        &self.limiter
    }
}

#[async_trait]
impl<D: DirectoryClient> DirectoryClient for RateLimited<D> {
    async fn get_guild(&self, guild_id: &str) -> DirectoryResult<RemoteGuild> {
        self.limiter.acquire().await;
        self.inner.get_guild(guild_id).await
    }

    async fn list_roles(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteRole>> {
        self.limiter.acquire().await;
        self.inner.list_roles(guild_id).await
    }

    async fn list_channels(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteChannel>> {
        self.limiter.acquire().await;
        self.inner.list_channels(guild_id).await
    }

    async fn get_channel(&self, channel_id: &str) -> DirectoryResult<RemoteChannel> {
        self.limiter.acquire().await;
        self.inner.get_channel(channel_id).await
    }

    async fn create_channel(
        &self,
        guild_id: &str,
        name: &str,
        kind: ChannelKind,
    ) -> DirectoryResult<RemoteChannel> {
        self.limiter.acquire().await;
        self.inner.create_channel(guild_id, name, kind).await
    }

    async fn edit_channel(
        &self,
        channel_id: &str,
        edit: &ChannelEdit,
    ) -> DirectoryResult<RemoteChannel> {
        self.limiter.acquire().await;
        self.inner.edit_channel(channel_id, edit).await
    }

    async fn allow_role_view(&self, channel_id: &str, role_id: &str) -> DirectoryResult<()> {
        self.limiter.acquire().await;
        self.inner.allow_role_view(channel_id, role_id).await
    }
}
