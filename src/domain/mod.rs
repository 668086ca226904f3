//! Domain layer for the room synchronization engine.
//!
//! This module contains business logic that is independent of
//! infrastructure concerns, plus the backing store trait the
//! infrastructure layer implements (dependency inversion).

pub mod entity;
pub mod error;
pub mod factory;
pub mod store;
pub mod value_object;

pub use entity::{ChatMessage, Identity, Room};
pub use error::{StoreError, ValueObjectError};
pub use factory::RoomCodeFactory;
pub use store::{BackingStore, Snapshot, SnapshotSubscription, WriteOutcome};
pub use value_object::{DisplayName, MessageId, MessageText, RoomCode, Timestamp, UserId};

#[cfg(test)]
pub use store::MockBackingStore;
