//! Remote directory clients for guildmirror.
//!
//! The [`DirectoryClient`] trait is the only way the reconciliation engine
//! talks to the authoritative directory. Implementations:
//!
//! - [`DiscordRestClient`]: bot client for the Discord v10 REST API
//! - [`InMemoryDirectory`]: deterministic fake with a mutation log
//! - [`RateLimited`]: puts a governor quota in front of either

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod discord;
mod memory;
mod rate_limited;
mod wire;

pub use client::DirectoryClient;
pub use discord::DiscordRestClient;
pub use memory::{InMemoryDirectory, Mutation};
pub use rate_limited::RateLimited;
