//! Core domain models for the room synchronization engine.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::value_object::{DisplayName, MessageId, MessageText, RoomCode, Timestamp, UserId};

/// The authenticated user driving a session.
///
/// Supplied by the external authentication layer and held for the session
/// lifetime; message authorship snapshots are taken from it at send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user identifier
    pub user_id: UserId,
    /// Current display name
    pub display_name: DisplayName,
}

impl Identity {
    /// Create a new identity
    pub fn new(user_id: UserId, display_name: DisplayName) -> Self {
        Self {
            user_id,
            display_name,
        }
    }
}

/// A code-addressed chat room record.
///
/// Created once and never mutated; existence is authoritative in the
/// backing store, never in a client-side cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room code; never changes after creation
    pub id: RoomCode,
    /// Identity of the creator
    pub owner_id: UserId,
    /// Creator's display name as of creation time (not live-updated)
    pub owner_name: DisplayName,
    /// Store-assigned creation timestamp
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new room record
    pub fn new(
        id: RoomCode,
        owner_id: UserId,
        owner_name: DisplayName,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner_id,
            owner_name,
            created_at,
        }
    }
}

/// A single chat message as mirrored from the backing store.
///
/// Immutable once stored. Within one room, messages form a total order by
/// `(sent_at, id)`; [`ChatMessage::ordering`] implements that key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Store-assigned identifier, unique within the room
    pub id: MessageId,
    /// Sender's user id as of send time
    pub author_id: UserId,
    /// Sender's display name as of send time
    pub author_name: DisplayName,
    /// Message content
    pub text: MessageText,
    /// Store-assigned send timestamp; the sole ordering key
    pub sent_at: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(
        id: MessageId,
        author_id: UserId,
        author_name: DisplayName,
        text: MessageText,
        sent_at: Timestamp,
    ) -> Self {
        Self {
            id,
            author_id,
            author_name,
            text,
            sent_at,
        }
    }

    /// Total order within a room: ascending `sent_at`, then `id` as the
    /// tie-break.
    pub fn ordering(&self, other: &Self) -> Ordering {
        self.sent_at
            .cmp(&other.sent_at)
            .then_with(|| self.id.as_str().cmp(other.id.as_str()))
    }
}
