//! Error types for guildmirror.
//!
//! This crate provides the error types shared by every guildmirror crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The four conditions the reconciliation engine distinguishes map onto
//! these types as follows:
//! - **NotFound**: [`StoreErrorKind::NotFound`], [`DirectoryErrorKind::NotFound`],
//!   [`RoleErrorKind::NotFound`]
//! - **AlreadyInProgress**: [`SyncErrorKind::AlreadyInProgress`]
//! - **Transient**: [`DirectoryErrorKind::Transient`]
//! - **Fatal**: [`SyncErrorKind::Fatal`], which keeps the [`FailureClass`]
//!   of its cause so [`MirrorError::is_not_found`] and
//!   [`MirrorError::is_transient`] see through it
//!
//! # Examples
//!
//! ```
//! use guildmirror_error::{MirrorResult, StoreError, StoreErrorKind};
//!
//! fn load_group(id: &str) -> MirrorResult<String> {
//!     Err(StoreError::new(StoreErrorKind::NotFound {
//!         collection: "Groups".to_string(),
//!         id: id.to_string(),
//!     }))?
//! }
//!
//! match load_group("1234") {
//!     Ok(name) => println!("Got: {}", name),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod directory;
mod error;
mod role;
mod store;
mod sync;

pub use config::ConfigError;
pub use directory::{DirectoryError, DirectoryErrorKind, DirectoryResult};
pub use error::{MirrorError, MirrorErrorKind, MirrorResult};
pub use role::{RoleError, RoleErrorKind, RoleResult};
pub use store::{StoreError, StoreErrorKind, StoreResult};
pub use sync::{FailureClass, SyncError, SyncErrorKind, SyncResult};
