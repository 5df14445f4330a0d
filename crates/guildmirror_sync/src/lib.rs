//! Reconciliation engine for guildmirror.
//!
//! Keeps the local mirror of guilds and navigation nodes consistent with the
//! remote directory:
//!
//! - [`RoleResolver`] maps role labels to remote role ids
//! - [`DriftRepairer`] probes navigation nodes and repairs the dangling ones
//! - [`SyncCoordinator`] serializes passes and runs them per guild or over
//!   the whole deployment
//!
//! Calls out to the rest of the bot go through [`PermissionSync`] and
//! [`MemberRepair`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collaborators;
mod coordinator;
mod repair;
mod roles;
mod summary;

pub use collaborators::{
    DirectoryPermissionSync, MemberRepair, NoMemberRepair, NoPermissionSync, PermissionSync,
};
pub use coordinator::{SyncCoordinator, SyncCoordinatorBuilder, SyncOutcome};
pub use repair::{
    DriftRepairer, NodeOutcome, RepairPlan, RepairReport, find_category, matching_channel,
};
pub use roles::{RoleResolver, match_role, title_case};
pub use summary::{deployment_summary, tenant_summary};
