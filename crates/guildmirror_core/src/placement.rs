//! Member placements.

use serde::{Deserialize, Serialize};

/// Where a locally known member currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberPlacement {
    /// User id
    pub member_id: String,
    /// Guild the member is associated with
    pub guild_id: String,
    /// Room (channel) the member is in; empty if none
    #[serde(default)]
    pub room_id: String,
}

impl MemberPlacement {
    /// Creates a placement.
    pub fn new(
        member_id: impl Into<String>,
        guild_id: impl Into<String>,
        room_id: impl Into<String>,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            guild_id: guild_id.into(),
            room_id: room_id.into(),
        }
    }

    /// Whether the member is currently in a room.
    pub fn is_placed(&self) -> bool {
        !self.room_id.is_empty()
    }
}
