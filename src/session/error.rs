//! Session layer error definitions.
//!
//! The four user-visible failure outcomes (room creation exhausted, room
//! not found, subscription failed, send failed) stay distinguishable all
//! the way up; nothing here collapses them into a generic failure.

use thiserror::Error;

use crate::domain::{StoreError, ValueObjectError};

/// Errors from room creation and resolution.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No free room code was found within the retry budget. Fatal to this
    /// create attempt; the caller may retry later.
    #[error("could not allocate a free room code after {attempts} attempts")]
    CreationExhausted { attempts: usize },

    /// The join target does not exist. Recoverable; the user re-enters the
    /// code.
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    /// A stored record failed domain validation.
    #[error("stored room record is invalid: {0}")]
    InvalidRecord(#[from] ValueObjectError),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the live message stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The text failed local validation; no store call was made.
    #[error("message text rejected: {0}")]
    InvalidText(#[source] ValueObjectError),

    /// A single message write did not persist. Recoverable; prior history
    /// is unaffected and the last-known-good snapshot is retained.
    #[error("message could not be delivered to the store")]
    SendFailed(#[source] StoreError),

    /// The live view could not be established. Recoverable; the user may
    /// retry opening the room.
    #[error("could not establish a live view of the room")]
    SubscriptionFailed(#[source] StoreError),
}

/// Errors surfaced to the session's caller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No authenticated identity is available.
    #[error("not signed in")]
    NotSignedIn,

    /// The session already has an active room; switching rooms is
    /// leave-then-join.
    #[error("already in room '{0}'; leave it before entering another")]
    AlreadyInRoom(String),

    /// Room creation or resolution failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The message stream failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
}
