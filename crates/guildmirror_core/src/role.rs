//! Well-known functional roles.

use serde::{Deserialize, Serialize};

/// The four roles a directory group caches by id.
///
/// Admin, Moderator and Builder are found by a configurable label. Everyone
/// is the guild's implicit role and is found by a reserved name.
///
/// # Examples
///
/// ```
/// use guildmirror_core::WellKnownRole;
///
/// assert!(WellKnownRole::Everyone.is_implicit());
/// assert_eq!(WellKnownRole::EVERYONE_NAME, "@everyone");
/// assert_eq!(WellKnownRole::Admin.to_string(), "admin");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum WellKnownRole {
    /// Guild administrators
    #[display("admin")]
    Admin,
    /// Builders of rooms
    #[display("builder")]
    Builder,
    /// Moderators
    #[display("moderator")]
    Moderator,
    /// The implicit role every member holds
    #[display("everyone")]
    Everyone,
}

impl WellKnownRole {
    /// Reserved name of the implicit everyone role. Not configurable.
    pub const EVERYONE_NAME: &'static str = "@everyone";

    /// Whether the role is the guild's implicit everyone role.
    pub fn is_implicit(self) -> bool {
        matches!(self, WellKnownRole::Everyone)
    }
}
