//! Core data types for guildmirror.
//!
//! This crate provides the records the reconciliation engine keeps in its
//! local mirror, the snapshot types it receives from the remote directory,
//! and the layered configuration shared by every other crate.
//!
//! - [`DirectoryGroup`] - one record per guild (tenant)
//! - [`NavigationNode`] - one record per room, bound to a remote channel
//! - [`RemoteGuild`], [`RemoteRole`], [`RemoteChannel`] - remote truth
//! - [`WellKnownRole`] - the four functional roles cached on a group
//! - [`MirrorConfig`] - bundled defaults merged with user overrides

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod group;
mod node;
mod placement;
mod remote;
mod role;

pub use config::{
    DiscordConfig, LoggingConfig, MirrorConfig, PacingConfig, RepairConfig, RolesConfig,
    StorageConfig,
};
pub use group::DirectoryGroup;
pub use node::{Direction, NavigationNode, NavigationNodeBuilder, NodeLink};
pub use placement::MemberPlacement;
pub use remote::{ChannelEdit, ChannelKind, RemoteChannel, RemoteGuild, RemoteMember, RemoteRole};
pub use role::WellKnownRole;
