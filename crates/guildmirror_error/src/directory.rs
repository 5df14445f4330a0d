//! Remote directory error types.
//!
//! The reconciliation engine branches on exactly one remote condition:
//! a channel that the directory no longer knows about. Everything else is
//! either a lookup miss or a failure that aborts the current pass.

use crate::FailureClass;

/// Remote directory error conditions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DirectoryErrorKind {
    /// The directory reports the channel as unknown (deleted or never existed).
    #[display("Unknown channel: {_0}")]
    UnknownChannel(String),

    /// Guild, role or other object not found.
    #[display("Not found: {_0}")]
    NotFound(String),

    /// Call failed for a reason not attributable to drift (network, 5xx, 429).
    #[display("Transient directory failure: {_0}")]
    Transient(String),

    /// The directory refused the request.
    #[display("Request rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message returned by the directory
        message: String,
    },

    /// Identifier is not a valid snowflake.
    #[display("Invalid ID: {_0}")]
    InvalidId(String),

    /// Response body could not be decoded.
    #[display("Malformed response: {_0}")]
    Decode(String),
}

impl DirectoryErrorKind {
    /// Class of the condition.
    pub fn class(&self) -> FailureClass {
        match self {
            DirectoryErrorKind::NotFound(_) => FailureClass::NotFound,
            DirectoryErrorKind::Transient(_) => FailureClass::Transient,
            _ => FailureClass::Other,
        }
    }
}

/// Remote directory error with source location tracking.
///
/// # Example
/// ```
/// use guildmirror_error::{DirectoryError, DirectoryErrorKind};
///
/// let err = DirectoryError::new(DirectoryErrorKind::UnknownChannel("99".into()));
/// assert!(err.is_unknown_channel());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Directory Error: {} at line {} in {}", kind, line, file)]
pub struct DirectoryError {
    /// The kind of error that occurred
    pub kind: DirectoryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DirectoryError {
    /// Create a new DirectoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DirectoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this is the "unknown channel" condition that drives repair.
    pub fn is_unknown_channel(&self) -> bool {
        matches!(self.kind, DirectoryErrorKind::UnknownChannel(_))
    }

    /// Whether the failure is transient.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind, DirectoryErrorKind::Transient(_))
    }
}

/// Result type for remote directory calls.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
