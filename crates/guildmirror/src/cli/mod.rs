//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the guildmirror binary.

mod commands;
mod handlers;

pub use commands::{Cli, Commands, SyncCommands};
pub use handlers::run;
