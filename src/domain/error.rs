//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// DisplayName validation error
    #[error("DisplayName cannot be blank")]
    DisplayNameEmpty,

    /// DisplayName too long error
    #[error("DisplayName cannot exceed {max} characters (got {actual})")]
    DisplayNameTooLong { max: usize, actual: usize },

    /// RoomCode length error
    #[error("RoomCode must be exactly {expected} characters (got {actual})")]
    RoomCodeLength { expected: usize, actual: usize },

    /// RoomCode alphabet error
    #[error("RoomCode must contain only A-Z and 0-9 (got: {0})")]
    RoomCodeCharset(String),

    /// MessageId validation error
    #[error("MessageId cannot be empty")]
    MessageIdEmpty,

    /// MessageText validation error
    #[error("MessageText cannot be blank")]
    MessageTextEmpty,

    /// MessageText too long error
    #[error("MessageText cannot exceed {max} characters (got {actual})")]
    MessageTextTooLong { max: usize, actual: usize },
}

/// Errors reported by the backing store.
///
/// The store is an external collaborator; every failure it can produce is
/// folded into this taxonomy so callers above the domain layer never see
/// transport-specific error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the operation
    #[error("backing store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be encoded or decoded
    #[error("failed to encode or decode a stored value: {0}")]
    Serialization(#[from] serde_json::Error),
}
