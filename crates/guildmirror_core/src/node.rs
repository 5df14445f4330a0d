//! Navigation node (room) records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of a link between two rooms.
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
pub enum Direction {
    /// North
    #[display("north")]
    North,
    /// North-east
    #[display("north_east")]
    NorthEast,
    /// East
    #[display("east")]
    East,
    /// South-east
    #[display("south_east")]
    SouthEast,
    /// South
    #[display("south")]
    South,
    /// South-west
    #[display("south_west")]
    SouthWest,
    /// West
    #[display("west")]
    West,
    /// North-west
    #[display("north_west")]
    NorthWest,
    /// Up
    #[display("up")]
    Up,
    /// Down
    #[display("down")]
    Down,
}

/// One outgoing edge of the room graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLink {
    /// Id of the neighbouring room (empty if unreachable)
    #[serde(default)]
    pub target_id: String,
    /// Items required to traverse the link, in order
    #[serde(default)]
    pub required_item_ids: Vec<String>,
}

/// A room: a local record bound to one remote channel.
///
/// `id` equals the remote channel id once bound. The reconciliation engine
/// rebinds or deletes nodes but never creates them, and never touches
/// `links`.
///
/// # Examples
///
/// ```
/// use guildmirror_core::{Direction, NavigationNode, NodeLink};
///
/// let mut hall = NavigationNode::new("500", "1001", "hall");
/// hall.links.insert(
///     Direction::North,
///     NodeLink { target_id: "501".into(), required_item_ids: vec!["key".into()] },
/// );
/// assert_eq!(hall.link(Direction::North).map(|l| l.target_id.as_str()), Some("501"));
/// assert!(hall.link(Direction::Up).is_none());
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder,
)]
#[builder(setter(into), default)]
pub struct NavigationNode {
    /// Remote channel id (primary key)
    pub id: String,
    /// Guild the room belongs to
    #[serde(default)]
    pub guild_id: String,
    /// Room name, matched against remote channel names
    #[serde(default)]
    pub name: String,
    /// Remote category the channel lives under
    #[serde(default)]
    pub parent_id: String,
    /// Role granted default access to the room (may be empty)
    #[serde(default)]
    pub role_id: String,
    /// Directional links to neighbouring rooms
    #[serde(default)]
    pub links: BTreeMap<Direction, NodeLink>,
}

impl NavigationNode {
    /// Creates an unlinked room.
    pub fn new(id: impl Into<String>, guild_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            guild_id: guild_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates a builder.
    pub fn builder() -> NavigationNodeBuilder {
        NavigationNodeBuilder::default()
    }

    /// Link in a direction, if any.
    pub fn link(&self, direction: Direction) -> Option<&NodeLink> {
        self.links.get(&direction)
    }
}
