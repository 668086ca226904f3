//! Room/session synchronization core for code-addressed chat rooms.
//!
//! This library implements the synchronization engine of a short-lived,
//! code-addressed chat system: room-code generation and membership
//! resolution, a live ordered message stream per room, and the
//! subscription lifecycle that keeps a client's view consistent with a
//! shared backing store. The store itself is an external collaborator
//! behind the [`domain::BackingStore`] trait; an in-process implementation
//! lives in the infrastructure layer.

pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod session;
pub mod time;

// Re-export the user-facing surface
pub use domain::{ChatMessage, Identity, Room, RoomCode};
pub use infrastructure::InMemoryBackingStore;
pub use session::{ChatSession, IdentityContext, MessageStream, RoomRegistry, SessionError};
