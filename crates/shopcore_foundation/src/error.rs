//! Error types for the shopcore system.
//!
//! Uses `thiserror` for ergonomic error definition; every violation is
//! raised synchronously before any state is touched.

use thiserror::Error;

/// Convenience alias used across all shopcore crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for shopcore operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an invalid argument error (missing, foreign, or self participant).
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates an out of range error for a named field.
    #[must_use]
    pub fn out_of_range(field: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfRange {
            field,
            message: message.into(),
        })
    }

    /// Creates a conflict error (duplicate name or association pair).
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict(message.into()))
    }

    /// Creates a policy violation error (age-gated purchase).
    #[must_use]
    pub fn policy_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PolicyViolation(message.into()))
    }

    /// Creates an invalid operation error (mutation forbidden in the current state).
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation(message.into()))
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(kind: &'static str, index: u64) -> Self {
        Self::new(ErrorKind::EntityNotFound { kind, index })
    }

    /// Creates a stale handle error (slot reused since the handle was issued).
    #[must_use]
    pub fn stale_handle(kind: &'static str, index: u64, generation: u32) -> Self {
        Self::new(ErrorKind::StaleHandle {
            kind,
            index,
            generation,
        })
    }

    /// Creates a codec error from a serialization failure.
    #[must_use]
    pub fn codec(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Codec(message.into()))
    }

    /// Creates an internal error for a broken invariant.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A required participant is missing, of the wrong kind, or the entity itself.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A field value falls outside its permitted range.
    #[error("{field} out of range: {message}")]
    OutOfRange {
        /// The field that was rejected.
        field: &'static str,
        /// Description of the permitted range.
        message: String,
    },

    /// A uniqueness rule was violated (product name, association pair).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A domain policy forbids the mutation (adult product, minor customer).
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// The mutation is forbidden in the entity's current state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Handle refers to a slot that holds no live entity.
    #[error("{kind} not found: slot {index}")]
    EntityNotFound {
        /// Singular name of the entity type.
        kind: &'static str,
        /// The slot index that was dereferenced.
        index: u64,
    },

    /// Handle generation does not match the slot (entity was removed).
    #[error("stale {kind} handle: slot {index}v{generation}")]
    StaleHandle {
        /// Singular name of the entity type.
        kind: &'static str,
        /// The slot index that was dereferenced.
        index: u64,
        /// The generation the handle carries.
        generation: u32,
    },

    /// Persistence I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Persistence encode/decode failure.
    #[error("codec error: {0}")]
    Codec(String),

    /// An internal invariant no longer holds.
    #[error("internal error: {0}")]
    Internal(String),
}
