//! Discord REST payloads and error classification.
//!
//! Only the fields the mirror reads are modelled; unknown fields are ignored.

use guildmirror_core::{ChannelKind, RemoteChannel, RemoteGuild, RemoteMember, RemoteRole};
use guildmirror_error::{DirectoryError, DirectoryErrorKind, DirectoryResult};
use serde::{Deserialize, Serialize};

/// JSON error code for a deleted or never-existing channel.
pub(crate) const UNKNOWN_CHANNEL: u32 = 10003;
/// JSON error code for an unknown guild.
pub(crate) const UNKNOWN_GUILD: u32 = 10004;
/// VIEW_CHANNEL permission bit.
pub(crate) const VIEW_CHANNEL: u64 = 1 << 10;

const TEXT: u8 = 0;
const VOICE: u8 = 2;
const CATEGORY: u8 = 4;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GuildJson {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    #[serde(default)]
    pub afk_channel_id: Option<String>,
    #[serde(default)]
    pub afk_timeout: u32,
    #[serde(default)]
    pub icon: Option<String>,
}

impl GuildJson {
    pub fn into_remote(
        self,
        members: Vec<RemoteMember>,
        channels: Vec<RemoteChannel>,
    ) -> RemoteGuild {
        RemoteGuild {
            id: self.id,
            name: self.name,
            owner_id: self.owner_id,
            afk_channel_id: self.afk_channel_id.unwrap_or_default(),
            afk_timeout_seconds: self.afk_timeout,
            icon: self.icon.unwrap_or_default(),
            members,
            channels,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChannelJson {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl From<ChannelJson> for RemoteChannel {
    fn from(json: ChannelJson) -> Self {
        Self {
            id: json.id,
            name: json.name.unwrap_or_default(),
            kind: kind_from_wire(json.kind),
            parent_id: json.parent_id.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RoleJson {
    pub id: String,
    pub name: String,
}

impl From<RoleJson> for RemoteRole {
    fn from(json: RoleJson) -> Self {
        RemoteRole::new(json.id, json.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserJson {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MemberJson {
    #[serde(default)]
    pub user: Option<UserJson>,
}

impl MemberJson {
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorJson {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateChannelBody<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: u8,
}

#[derive(Debug, Serialize)]
pub(crate) struct EditChannelBody<'a> {
    pub name: &'a str,
    pub parent_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OverwriteBody {
    /// 0 = role, 1 = member
    #[serde(rename = "type")]
    pub kind: u8,
    pub allow: String,
    pub deny: String,
}

impl OverwriteBody {
    pub fn allow_view() -> Self {
        Self {
            kind: 0,
            allow: VIEW_CHANNEL.to_string(),
            deny: "0".to_string(),
        }
    }
}

pub(crate) fn kind_from_wire(kind: u8) -> ChannelKind {
    match kind {
        TEXT => ChannelKind::Text,
        VOICE => ChannelKind::Voice,
        CATEGORY => ChannelKind::Category,
        _ => ChannelKind::Other,
    }
}

/// Wire type for a channel to create. `Other` is created as text.
pub(crate) fn kind_to_wire(kind: ChannelKind) -> u8 {
    match kind {
        ChannelKind::Voice => VOICE,
        ChannelKind::Category => CATEGORY,
        ChannelKind::Text | ChannelKind::Other => TEXT,
    }
}

/// Map a failed response to an error kind.
///
/// `subject` names what was asked for (a channel or guild id) and ends up in
/// the error message.
pub(crate) fn classify(status: u16, body: &str, subject: &str) -> DirectoryErrorKind {
    let error: ErrorJson = serde_json::from_str(body).unwrap_or_default();
    let message = if error.message.is_empty() {
        body.to_string()
    } else {
        error.message
    };

    match (status, error.code) {
        (_, UNKNOWN_CHANNEL) => DirectoryErrorKind::UnknownChannel(subject.to_string()),
        (_, UNKNOWN_GUILD) | (404, _) => {
            DirectoryErrorKind::NotFound(format!("{}: {}", subject, message))
        }
        (429, _) | (500..=599, _) => {
            DirectoryErrorKind::Transient(format!("status {}: {}", status, message))
        }
        _ => DirectoryErrorKind::Rejected { status, message },
    }
}

/// Check that an id is a snowflake before putting it into a URL.
#[track_caller]
pub(crate) fn snowflake(id: &str) -> DirectoryResult<&str> {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(id)
    } else {
        Err(DirectoryError::new(DirectoryErrorKind::InvalidId(id.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_channel_code_wins_over_status() {
        let body = r#"{"message": "Unknown Channel", "code": 10003}"#;
        assert_eq!(
            classify(404, body, "42"),
            DirectoryErrorKind::UnknownChannel("42".into())
        );
    }

    #[test]
    fn unknown_guild_is_not_found() {
        let body = r#"{"message": "Unknown Guild", "code": 10004}"#;
        assert!(matches!(
            classify(404, body, "7"),
            DirectoryErrorKind::NotFound(msg) if msg == "7: Unknown Guild"
        ));
    }

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        let body = r#"{"message": "You are being rate limited.", "retry_after": 1.5, "global": false}"#;
        assert!(matches!(classify(429, body, "7"), DirectoryErrorKind::Transient(_)));
        assert!(matches!(
            classify(502, "<html>bad gateway</html>", "7"),
            DirectoryErrorKind::Transient(msg) if msg.contains("bad gateway")
        ));
    }

    #[test]
    fn other_failures_are_rejected() {
        let body = r#"{"message": "Missing Permissions", "code": 50013}"#;
        assert_eq!(
            classify(403, body, "7"),
            DirectoryErrorKind::Rejected {
                status: 403,
                message: "Missing Permissions".into()
            }
        );
    }

    #[test]
    fn channel_decoding() {
        let json = r#"{"id": "11", "type": 4, "name": "The Aether", "parent_id": null, "position": 3}"#;
        let channel: RemoteChannel = serde_json::from_str::<ChannelJson>(json).unwrap().into();
        assert_eq!(channel.kind, ChannelKind::Category);
        assert_eq!(channel.parent_id, "");

        let json = r#"{"id": "12", "type": 15, "name": "forum", "parent_id": "11"}"#;
        let channel: RemoteChannel = serde_json::from_str::<ChannelJson>(json).unwrap().into();
        assert_eq!(channel.kind, ChannelKind::Other);
        assert_eq!(channel.parent_id, "11");
    }

    #[test]
    fn guild_decoding_fills_optional_fields() {
        let json = r#"{"id": "1", "name": "Keep", "owner_id": "9", "icon": null, "afk_channel_id": null, "afk_timeout": 300}"#;
        let guild = serde_json::from_str::<GuildJson>(json)
            .unwrap()
            .into_remote(vec![], vec![]);
        assert_eq!(guild.icon, "");
        assert_eq!(guild.afk_channel_id, "");
        assert_eq!(guild.afk_timeout_seconds, 300);
    }

    #[test]
    fn view_overwrite_body() {
        let body = serde_json::to_value(OverwriteBody::allow_view()).unwrap();
        assert_eq!(body["type"], 0);
        assert_eq!(body["allow"], "1024");
    }

    #[test]
    fn snowflake_validation() {
        assert!(snowflake("123456789012345678").is_ok());
        assert!(snowflake("").is_err());
        assert!(snowflake("12/../34").is_err());
    }
}
