//! Snapshot types returned by the remote directory.
//!
//! These mirror only the fields the reconciliation engine reads. Identifiers
//! are kept as strings so the local records never depend on a particular
//! client library's id types.

use serde::{Deserialize, Serialize};

/// Kind of a remote channel.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Text channel
    #[default]
    #[display("text")]
    Text,
    /// Voice channel
    #[display("voice")]
    Voice,
    /// Category container
    #[display("category")]
    Category,
    /// Any other channel type
    #[display("other")]
    Other,
}

/// A remote channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteChannel {
    /// Channel id
    pub id: String,
    /// Channel name
    pub name: String,
    /// Channel type
    #[serde(default)]
    pub kind: ChannelKind,
    /// Parent category id (empty if none)
    #[serde(default)]
    pub parent_id: String,
}

impl RemoteChannel {
    /// Creates a channel without a parent.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            parent_id: String::new(),
        }
    }
}

/// A remote role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRole {
    /// Role id
    pub id: String,
    /// Display name
    pub name: String,
}

impl RemoteRole {
    /// Creates a role.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A remote guild member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMember {
    /// User id
    pub user_id: String,
}

/// Snapshot of a remote guild, including its members and channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteGuild {
    /// Guild id
    pub id: String,
    /// Guild name
    pub name: String,
    /// Owner user id
    pub owner_id: String,
    /// AFK channel id (empty if unset)
    #[serde(default)]
    pub afk_channel_id: String,
    /// AFK timeout in seconds
    #[serde(default)]
    pub afk_timeout_seconds: u32,
    /// Icon hash (empty if unset)
    #[serde(default)]
    pub icon: String,
    /// Members
    #[serde(default)]
    pub members: Vec<RemoteMember>,
    /// Channels
    #[serde(default)]
    pub channels: Vec<RemoteChannel>,
}

/// Fields to change on an existing channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEdit {
    /// New name
    pub name: String,
    /// New parent category (empty to detach)
    pub parent_id: String,
}
