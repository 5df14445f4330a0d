//! guildmirror keeps a local mirror of Discord guilds consistent with the
//! remote directory.
//!
//! The mirror holds one [`DirectoryGroup`] per guild and one
//! [`NavigationNode`] per room channel. A [`SyncCoordinator`] repairs drift
//! between the two: dangling nodes are rebound to renamed channels,
//! duplicates are dropped, missing channels are recreated, and guild roles
//! and members are brought up to date.
//!
//! # Quick Start
//!
//! ```no_run
//! use guildmirror::{DiscordRestClient, EntityStore, MirrorConfig, RateLimited, SyncCoordinator};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MirrorConfig::load()?;
//! let client = DiscordRestClient::from_config(&config.discord)?;
//! let directory = Arc::new(RateLimited::per_minute(client, config.discord.requests_per_minute));
//! let store = EntityStore::open(&config.storage.path).await?;
//!
//! let coordinator = SyncCoordinator::from_config(&config, directory, store);
//! let outcome = coordinator.sync_tenant("123456789012345678").await?;
//! println!("Synced in {:?}: {}", outcome.duration(), outcome.report());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `guildmirror_error` - error kinds with location tracking
//! - `guildmirror_core` - data model and layered configuration
//! - `guildmirror_store` - entity store (in-memory or JSON files)
//! - `guildmirror_rate_limit` - pacing and request quotas
//! - `guildmirror_directory` - Discord REST and in-memory directory clients
//! - `guildmirror_sync` - role resolution, drift repair, sync coordination

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observability;

pub use observability::{ObservabilityConfig, init_observability};

pub use guildmirror_error::{
    ConfigError, DirectoryError, DirectoryErrorKind, DirectoryResult, FailureClass, MirrorError,
    MirrorErrorKind, MirrorResult, RoleError, RoleErrorKind, RoleResult, StoreError,
    StoreErrorKind, StoreResult, SyncError, SyncErrorKind, SyncResult,
};

pub use guildmirror_core::{
    ChannelEdit, ChannelKind, Direction, DirectoryGroup, DiscordConfig, LoggingConfig,
    MemberPlacement, MirrorConfig, NavigationNode, NavigationNodeBuilder, NodeLink, PacingConfig,
    RemoteChannel, RemoteGuild, RemoteMember, RemoteRole, RepairConfig, RolesConfig,
    StorageConfig, WellKnownRole,
};

pub use guildmirror_store::{
    Collection, EntityStore, GroupRepository, JsonFileCollection, MemoryCollection,
    NodeRepository, Record,
};

pub use guildmirror_rate_limit::{FixedPacer, NoPacing, PaceStep, Pacer, RequestLimiter};

pub use guildmirror_directory::{
    DirectoryClient, DiscordRestClient, InMemoryDirectory, Mutation, RateLimited,
};

pub use guildmirror_sync::{
    DirectoryPermissionSync, DriftRepairer, MemberRepair, NoMemberRepair, NoPermissionSync,
    NodeOutcome, PermissionSync, RepairPlan, RepairReport, RoleResolver, SyncCoordinator,
    SyncCoordinatorBuilder, SyncOutcome, deployment_summary, tenant_summary,
};
