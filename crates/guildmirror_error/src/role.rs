//! Role resolution error types.

use crate::{DirectoryError, DirectoryErrorKind};

/// Role resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RoleErrorKind {
    /// No remote role carries the requested label.
    ///
    /// This is a configuration problem on the guild (the role was renamed or
    /// deleted) and is not retried.
    #[display("Role '{label}' not found in guild {guild_id}")]
    NotFound {
        /// Guild that was searched
        guild_id: String,
        /// Normalized label that was looked for
        label: String,
    },

    /// Listing roles failed.
    #[display("Role listing failed: {_0}")]
    Directory(DirectoryErrorKind),
}

/// Role resolution error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Role Error: {} at line {} in {}", kind, line, file)]
pub struct RoleError {
    /// The kind of error that occurred
    pub kind: RoleErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RoleError {
    /// Create a new role error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RoleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the label did not match any remote role.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, RoleErrorKind::NotFound { .. })
    }
}

impl From<DirectoryError> for RoleError {
    #[track_caller]
    fn from(err: DirectoryError) -> Self {
        RoleError::new(RoleErrorKind::Directory(err.kind))
    }
}

/// Result type for role resolution.
pub type RoleResult<T> = Result<T, RoleError>;
