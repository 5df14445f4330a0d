//! Sync coordinator error types.

use crate::MirrorError;

/// What kind of failure aborted a pass.
///
/// Kept on [`SyncErrorKind::Fatal`] alongside the cause's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FailureClass {
    /// A record, role or remote object does not exist
    #[display("not found")]
    NotFound,
    /// The directory was unreachable, throttled or failing
    #[display("transient")]
    Transient,
    /// Anything else
    #[display("other")]
    Other,
}

/// Sync coordinator error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SyncErrorKind {
    /// Another pass (guild or deployment-wide) is running.
    #[display("Sync already in progress, wait until the current one has completed")]
    AlreadyInProgress,

    /// The guild has no directory group record.
    #[display("Guild {_0} is not registered")]
    NotRegistered(String),

    /// A step of the pass failed; the rest of the guild's pass was abandoned.
    #[display("Sync of guild {guild_id} aborted while {context}: {cause}")]
    Fatal {
        /// Guild whose pass was aborted
        guild_id: String,
        /// What the pass was doing (e.g. "repairing node 123: hall")
        context: String,
        /// Message of the underlying error
        cause: String,
        /// Class of the underlying error
        class: FailureClass,
    },
}

/// Sync error with location tracking.
///
/// # Examples
///
/// ```
/// use guildmirror_error::{SyncError, SyncErrorKind};
///
/// let err = SyncError::new(SyncErrorKind::AlreadyInProgress);
/// assert!(err.is_already_in_progress());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Sync Error: {} at line {} in {}", kind, line, file)]
pub struct SyncError {
    /// The kind of error that occurred
    pub kind: SyncErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SyncError {
    /// Create a new sync error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SyncErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Wrap a failure as fatal to a guild's pass.
    ///
    /// The cause's message and class are both kept.
    ///
    /// ```
    /// use guildmirror_error::{FailureClass, RoleError, RoleErrorKind, SyncError};
    ///
    /// let missing = RoleError::new(RoleErrorKind::NotFound {
    ///     guild_id: "7".into(),
    ///     label: "Admin".into(),
    /// });
    /// let err = SyncError::fatal("7", "resolving well-known roles", missing);
    /// assert_eq!(err.class(), Some(FailureClass::NotFound));
    /// assert!(err.to_string().contains("'Admin' not found"));
    /// ```
    #[track_caller]
    pub fn fatal(
        guild_id: impl Into<String>,
        context: impl Into<String>,
        cause: impl Into<MirrorError>,
    ) -> Self {
        let cause = cause.into();
        Self::new(SyncErrorKind::Fatal {
            guild_id: guild_id.into(),
            context: context.into(),
            class: cause.failure_class(),
            cause: cause.to_string(),
        })
    }

    /// Class of the failure that aborted the pass, if it was aborted.
    pub fn class(&self) -> Option<FailureClass> {
        match &self.kind {
            SyncErrorKind::Fatal { class, .. } => Some(*class),
            _ => None,
        }
    }

    /// Whether the run was rejected because another one is active.
    pub fn is_already_in_progress(&self) -> bool {
        matches!(self.kind, SyncErrorKind::AlreadyInProgress)
    }

    /// Whether a pass was aborted mid-way.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, SyncErrorKind::Fatal { .. })
    }
}

/// Result type for sync runs.
pub type SyncResult<T> = Result<T, SyncError>;
