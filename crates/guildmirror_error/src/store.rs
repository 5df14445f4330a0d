//! Entity store error types.

/// Kinds of entity store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// No record with the given primary key exists in the collection
    #[display("No record '{id}' in collection {collection}")]
    NotFound {
        /// Collection name ("Groups", "Nodes")
        collection: String,
        /// Primary key that was looked up
        id: String,
    },
    /// Reading or writing the backing file failed
    #[display("Storage I/O failed: {_0}")]
    Io(String),
    /// A record could not be encoded or decoded
    #[display("Serialization error: {_0}")]
    Serialization(String),
}

/// Entity store error with location tracking.
///
/// # Examples
///
/// ```
/// use guildmirror_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::NotFound {
///     collection: "Nodes".to_string(),
///     id: "42".to_string(),
/// });
/// assert!(err.is_not_found());
/// assert!(format!("{}", err).contains("No record '42'"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a [`StoreErrorKind::NotFound`] error.
    #[track_caller]
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound {
            collection: collection.into(),
            id: id.into(),
        })
    }

    /// Whether the record was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, StoreErrorKind::NotFound { .. })
    }
}

/// Result type for entity store operations.
pub type StoreResult<T> = Result<T, StoreError>;
