//! Discord REST implementation of [`DirectoryClient`].

use crate::DirectoryClient;
use crate::wire::{
    self, ChannelJson, CreateChannelBody, EditChannelBody, GuildJson, MemberJson, OverwriteBody,
    RoleJson,
};
use async_trait::async_trait;
use guildmirror_core::{
    ChannelEdit, ChannelKind, DiscordConfig, RemoteChannel, RemoteGuild, RemoteMember, RemoteRole,
};
use guildmirror_error::{ConfigError, DirectoryError, DirectoryErrorKind, DirectoryResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

/// Members are listed in pages of this size (the API maximum).
const MEMBER_PAGE: usize = 1000;

/// Bot client for the Discord v10 REST API.
///
/// # Example
///
/// ```no_run
/// use guildmirror_core::MirrorConfig;
/// use guildmirror_directory::{DirectoryClient, DiscordRestClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MirrorConfig::load()?;
/// let client = DiscordRestClient::from_config(&config.discord)?;
/// let guild = client.get_guild("123456789012345678").await?;
/// println!("{} has {} members", guild.name, guild.members.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct DiscordRestClient {
    #[getter(skip)]
    client: Client,
    /// Base URL, e.g. `https://discord.com/api/v10`
    api_base: String,
    #[getter(skip)]
    token: String,
}

impl DiscordRestClient {
    /// Creates a client for `api_base` authenticating with a bot token.
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(concat!(
                "DiscordBot (https://github.com/crumplecup/guildmirror, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Creates a client from the `[discord]` section, reading the token from
    /// the configured environment variable.
    pub fn from_config(config: &DiscordConfig) -> Result<Self, ConfigError> {
        let token = std::env::var(&config.token_env)
            .map_err(|_| ConfigError::missing_env(&config.token_env))?;
        Self::new(&config.api_base, token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Bot {}", self.token))
    }

    /// Send a request and turn non-success statuses into errors.
    async fn execute(&self, request: RequestBuilder, subject: &str) -> DirectoryResult<Response> {
        let response = self.authorized(request).send().await.map_err(|e| {
            error!(error = ?e, "Discord API request failed");
            DirectoryError::new(DirectoryErrorKind::Transient(format!(
                "Request failed: {}",
                e
            )))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let kind = wire::classify(status.as_u16(), &body, subject);
        debug!(status = %status, kind = %kind, "Discord API returned error");
        Err(DirectoryError::new(kind))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> DirectoryResult<T> {
        response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Discord response");
            DirectoryError::new(DirectoryErrorKind::Decode(e.to_string()))
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, subject: &str) -> DirectoryResult<T> {
        debug!(path, "Discord API GET");
        let response = self.execute(self.client.get(self.url(path)), subject).await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn list_members(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteMember>> {
        let mut members = Vec::new();
        let mut after = "0".to_string();

        loop {
            let page: Vec<MemberJson> = self
                .get_json(
                    &format!(
                        "/guilds/{}/members?limit={}&after={}",
                        guild_id, MEMBER_PAGE, after
                    ),
                    guild_id,
                )
                .await?;
            let full_page = page.len() == MEMBER_PAGE;

            for member in &page {
                if let Some(user_id) = member.user_id() {
                    members.push(RemoteMember {
                        user_id: user_id.to_string(),
                    });
                }
            }

            match page.last().and_then(MemberJson::user_id) {
                Some(last) if full_page => after = last.to_string(),
                _ => break,
            }
        }

        debug!(count = members.len(), "Listed guild members");
        Ok(members)
    }
}

#[async_trait]
impl DirectoryClient for DiscordRestClient {
    #[instrument(skip(self))]
    async fn get_guild(&self, guild_id: &str) -> DirectoryResult<RemoteGuild> {
        let guild_id = wire::snowflake(guild_id)?;
        let guild: GuildJson = self
            .get_json(&format!("/guilds/{}", guild_id), guild_id)
            .await?;
        let members = self.list_members(guild_id).await?;
        let channels = self.list_channels(guild_id).await?;
        Ok(guild.into_remote(members, channels))
    }

    #[instrument(skip(self))]
    async fn list_roles(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteRole>> {
        let guild_id = wire::snowflake(guild_id)?;
        let roles: Vec<RoleJson> = self
            .get_json(&format!("/guilds/{}/roles", guild_id), guild_id)
            .await?;
        Ok(roles.into_iter().map(RemoteRole::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_channels(&self, guild_id: &str) -> DirectoryResult<Vec<RemoteChannel>> {
        let guild_id = wire::snowflake(guild_id)?;
        let channels: Vec<ChannelJson> = self
            .get_json(&format!("/guilds/{}/channels", guild_id), guild_id)
            .await?;
        Ok(channels.into_iter().map(RemoteChannel::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_channel(&self, channel_id: &str) -> DirectoryResult<RemoteChannel> {
        let channel_id = wire::snowflake(channel_id)?;
        let channel: ChannelJson = self
            .get_json(&format!("/channels/{}", channel_id), channel_id)
            .await?;
        Ok(channel.into())
    }

    #[instrument(skip(self))]
    async fn create_channel(
        &self,
        guild_id: &str,
        name: &str,
        kind: ChannelKind,
    ) -> DirectoryResult<RemoteChannel> {
        let guild_id = wire::snowflake(guild_id)?;
        let body = CreateChannelBody {
            name,
            kind: wire::kind_to_wire(kind),
        };
        let request = self
            .client
            .post(self.url(&format!("/guilds/{}/channels", guild_id)))
            .json(&body);
        let channel: ChannelJson = Self::decode(self.execute(request, guild_id).await?).await?;
        debug!(channel_id = %channel.id, "Created channel");
        Ok(channel.into())
    }

    #[instrument(skip(self, edit), fields(name = %edit.name, parent_id = %edit.parent_id))]
    async fn edit_channel(
        &self,
        channel_id: &str,
        edit: &ChannelEdit,
    ) -> DirectoryResult<RemoteChannel> {
        let channel_id = wire::snowflake(channel_id)?;
        let parent_id = if edit.parent_id.is_empty() {
            None
        } else {
            Some(wire::snowflake(&edit.parent_id)?)
        };
        let body = EditChannelBody {
            name: &edit.name,
            parent_id,
        };
        let request = self
            .client
            .patch(self.url(&format!("/channels/{}", channel_id)))
            .json(&body);
        let channel: ChannelJson = Self::decode(self.execute(request, channel_id).await?).await?;
        Ok(channel.into())
    }

    #[instrument(skip(self))]
    async fn allow_role_view(&self, channel_id: &str, role_id: &str) -> DirectoryResult<()> {
        let channel_id = wire::snowflake(channel_id)?;
        let role_id = wire::snowflake(role_id)?;
        let request = self
            .client
            .put(self.url(&format!("/channels/{}/permissions/{}", channel_id, role_id)))
            .json(&OverwriteBody::allow_view());
        self.execute(request, channel_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_variable_is_a_config_error() {
        let config = DiscordConfig {
            api_base: "https://discord.com/api/v10".into(),
            token_env: "GUILDMIRROR_TEST_TOKEN_THAT_IS_NEVER_SET".into(),
            requests_per_minute: 45,
        };
        let err = DiscordRestClient::from_config(&config).unwrap_err();
        assert_eq!(
            err.message,
            "Environment variable GUILDMIRROR_TEST_TOKEN_THAT_IS_NEVER_SET is not set"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = DiscordRestClient::new("http://localhost:8080/api/v10/", "t").unwrap();
        assert_eq!(client.api_base(), "http://localhost:8080/api/v10");
        assert_eq!(client.url("/guilds/1"), "http://localhost:8080/api/v10/guilds/1");
    }
}
