//! Directory group (guild) records.

use crate::{RemoteGuild, WellKnownRole};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Local mirror of one guild.
///
/// `id` is the primary key and never changes. Descriptive fields are
/// overwritten from the remote guild on every sync; `role_ids` and
/// `member_ids` only ever grow during a sync.
///
/// # Examples
///
/// ```
/// use guildmirror_core::DirectoryGroup;
///
/// let mut group = DirectoryGroup::new("1001");
/// assert!(group.add_role("77"));
/// assert!(!group.add_role("77"));
/// assert_eq!(group.role_ids.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryGroup {
    /// Guild identifier (primary key)
    pub id: String,
    /// Guild name
    #[serde(default)]
    pub name: String,
    /// Voice region, informational
    #[serde(default)]
    pub region: String,
    /// Icon hash
    #[serde(default)]
    pub icon: String,
    /// AFK channel identifier
    #[serde(default)]
    pub afk_channel_id: String,
    /// AFK timeout in seconds
    #[serde(default)]
    pub afk_timeout_seconds: u32,
    /// Owner user identifier
    #[serde(default)]
    pub owner_id: String,
    /// Remote role identifiers known to belong to the guild
    #[serde(default)]
    pub role_ids: BTreeSet<String>,
    /// Remote member identifiers known to belong to the guild
    #[serde(default)]
    pub member_ids: BTreeSet<String>,
    /// Cached id of the "Admin" role
    #[serde(default)]
    pub admin_role_id: String,
    /// Cached id of the "Moderator" role
    #[serde(default)]
    pub moderator_role_id: String,
    /// Cached id of the "Builder" role
    #[serde(default)]
    pub builder_role_id: String,
    /// Cached id of the implicit everyone role
    #[serde(default)]
    pub everyone_role_id: String,
}

impl DirectoryGroup {
    /// Creates an empty group for a guild id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Overwrites the remote-sourced descriptive fields.
    ///
    /// Returns true if any field changed.
    pub fn apply_remote(&mut self, remote: &RemoteGuild) -> bool {
        let before = (
            self.name.clone(),
            self.owner_id.clone(),
            self.afk_channel_id.clone(),
            self.afk_timeout_seconds,
            self.icon.clone(),
        );
        self.name = remote.name.clone();
        self.owner_id = remote.owner_id.clone();
        self.afk_channel_id = remote.afk_channel_id.clone();
        self.afk_timeout_seconds = remote.afk_timeout_seconds;
        self.icon = remote.icon.clone();
        before
            != (
                self.name.clone(),
                self.owner_id.clone(),
                self.afk_channel_id.clone(),
                self.afk_timeout_seconds,
                self.icon.clone(),
            )
    }

    /// Adds a role id. Returns false if it was already present.
    pub fn add_role(&mut self, role_id: impl Into<String>) -> bool {
        self.role_ids.insert(role_id.into())
    }

    /// Removes a role id by exact match. Returns false if it was absent.
    pub fn remove_role(&mut self, role_id: &str) -> bool {
        self.role_ids.remove(role_id)
    }

    /// Adds a member id. Returns false if it was already present.
    pub fn add_member(&mut self, member_id: impl Into<String>) -> bool {
        self.member_ids.insert(member_id.into())
    }

    /// Removes a member id by exact match. Returns false if it was absent.
    pub fn remove_member(&mut self, member_id: &str) -> bool {
        self.member_ids.remove(member_id)
    }

    /// Cached id of a well-known role (empty if never resolved).
    pub fn role(&self, role: WellKnownRole) -> &str {
        match role {
            WellKnownRole::Admin => &self.admin_role_id,
            WellKnownRole::Moderator => &self.moderator_role_id,
            WellKnownRole::Builder => &self.builder_role_id,
            WellKnownRole::Everyone => &self.everyone_role_id,
        }
    }

    /// Sets the cached id of a well-known role. Returns true if it changed.
    pub fn set_role(&mut self, role: WellKnownRole, role_id: impl Into<String>) -> bool {
        let slot = match role {
            WellKnownRole::Admin => &mut self.admin_role_id,
            WellKnownRole::Moderator => &mut self.moderator_role_id,
            WellKnownRole::Builder => &mut self.builder_role_id,
            WellKnownRole::Everyone => &mut self.everyone_role_id,
        };
        let role_id = role_id.into();
        if *slot == role_id {
            return false;
        }
        *slot = role_id;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_remote_reports_changes() {
        let mut group = DirectoryGroup::new("1");
        let remote = RemoteGuild {
            id: "1".into(),
            name: "Keep".into(),
            owner_id: "9".into(),
            ..Default::default()
        };
        assert!(group.apply_remote(&remote));
        assert!(!group.apply_remote(&remote));
        assert_eq!(group.name, "Keep");
        assert_eq!(group.owner_id, "9");
    }

    #[test]
    fn test_set_role_is_noop_for_same_value() {
        let mut group = DirectoryGroup::new("1");
        assert!(group.set_role(WellKnownRole::Builder, "5"));
        assert!(!group.set_role(WellKnownRole::Builder, "5"));
        assert_eq!(group.role(WellKnownRole::Builder), "5");
        assert_eq!(group.role(WellKnownRole::Admin), "");
    }

    #[test]
    fn test_member_removal_is_exact() {
        let mut group = DirectoryGroup::new("1");
        group.add_member("10");
        group.add_member("100");
        assert!(group.remove_member("10"));
        assert!(!group.remove_member("1"));
        assert!(group.member_ids.contains("100"));
    }
}
