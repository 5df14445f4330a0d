//! Top-level error wrapper types.

use crate::{
    ConfigError, DirectoryError, FailureClass, RoleError, RoleErrorKind, StoreError, SyncError,
};

/// Every error a guildmirror operation can surface.
///
/// # Examples
///
/// ```
/// use guildmirror_error::{MirrorError, SyncError, SyncErrorKind};
///
/// let err: MirrorError = SyncError::new(SyncErrorKind::AlreadyInProgress).into();
/// assert!(format!("{}", err).contains("already in progress"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MirrorErrorKind {
    /// Entity store error
    #[from(StoreError)]
    Store(StoreError),
    /// Remote directory error
    #[from(DirectoryError)]
    Directory(DirectoryError),
    /// Role resolution error
    #[from(RoleError)]
    Role(RoleError),
    /// Sync coordinator error
    #[from(SyncError)]
    Sync(SyncError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// guildmirror error with kind discrimination.
///
/// # Examples
///
/// ```
/// use guildmirror_error::{ConfigError, MirrorResult};
///
/// fn might_fail() -> MirrorResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("guildmirror Error: {}", _0)]
pub struct MirrorError(Box<MirrorErrorKind>);

impl MirrorError {
    /// Create a new error from a kind.
    pub fn new(kind: MirrorErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MirrorErrorKind {
        &self.0
    }

    /// Whether a sync was rejected because another one is running.
    pub fn is_already_in_progress(&self) -> bool {
        matches!(self.kind(), MirrorErrorKind::Sync(e) if e.is_already_in_progress())
    }

    /// Whether something looked up does not exist.
    ///
    /// Looks through a pass aborted by a missing record or role.
    pub fn is_not_found(&self) -> bool {
        self.failure_class() == FailureClass::NotFound
    }

    /// Whether the directory failed in a way worth retrying later.
    ///
    /// Looks through a pass aborted by such a failure.
    pub fn is_transient(&self) -> bool {
        self.failure_class() == FailureClass::Transient
    }

    /// Class of the underlying condition.
    pub fn failure_class(&self) -> FailureClass {
        match self.kind() {
            MirrorErrorKind::Store(e) if e.is_not_found() => FailureClass::NotFound,
            MirrorErrorKind::Directory(e) => e.kind.class(),
            MirrorErrorKind::Role(e) => match &e.kind {
                RoleErrorKind::NotFound { .. } => FailureClass::NotFound,
                RoleErrorKind::Directory(kind) => kind.class(),
            },
            MirrorErrorKind::Sync(e) => e.class().unwrap_or(FailureClass::Other),
            _ => FailureClass::Other,
        }
    }
}

// Generic From implementation for any type that converts to MirrorErrorKind
impl<T> From<T> for MirrorError
where
    T: Into<MirrorErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for guildmirror operations.
pub type MirrorResult<T> = std::result::Result<T, MirrorError>;
