//! Wire representations of stored records.
//!
//! The backing store holds plain JSON; these DTOs convert between that
//! shape and the domain models. Write-side encoding goes through the
//! `pending` constructors so server-assigned fields are always placeholder
//! values, never client clock readings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    ChatMessage, DisplayName, Identity, MessageId, MessageText, Room, RoomCode, Timestamp, UserId,
    ValueObjectError,
    store::server_timestamp,
};

/// Stored shape of a room record (the room code is the path key, not a
/// field).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRecord {
    pub owner_id: String,
    pub owner_name: String,
    pub created_at: i64,
}

impl RoomRecord {
    /// Encode a to-be-created room record with a server-timestamp
    /// placeholder for `created_at`.
    pub fn pending(owner: &Identity) -> Value {
        serde_json::json!({
            "owner_id": owner.user_id.as_str(),
            "owner_name": owner.display_name.as_str(),
            "created_at": server_timestamp(),
        })
    }

    /// Decode a stored room record.
    pub fn decode(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Convert into the domain model, re-validating stored fields.
    pub fn into_room(self, id: RoomCode) -> Result<Room, ValueObjectError> {
        Ok(Room::new(
            id,
            UserId::new(self.owner_id)?,
            DisplayName::new(self.owner_name)?,
            Timestamp::new(self.created_at),
        ))
    }
}

/// Stored shape of a message (the entry id is the collection key, not a
/// field).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub author_id: String,
    pub author_name: String,
    pub text: String,
    pub sent_at: i64,
}

impl MessageRecord {
    /// Encode a to-be-appended message with a server-timestamp placeholder
    /// for `sent_at`.
    pub fn pending(author: &Identity, text: &MessageText) -> Value {
        serde_json::json!({
            "author_id": author.user_id.as_str(),
            "author_name": author.display_name.as_str(),
            "text": text.as_str(),
            "sent_at": server_timestamp(),
        })
    }

    /// Decode a stored message record.
    pub fn decode(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Convert into the domain model, re-validating stored fields.
    pub fn into_message(self, id: String) -> Result<ChatMessage, ValueObjectError> {
        Ok(ChatMessage::new(
            MessageId::new(id)?,
            UserId::new(self.author_id)?,
            DisplayName::new(self.author_name)?,
            MessageText::new(self.text)?,
            Timestamp::new(self.sent_at),
        ))
    }
}
