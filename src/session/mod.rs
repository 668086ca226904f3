//! Session layer.
//!
//! Composes the domain model and the backing store into the user-facing
//! room experience: create/join, the live message stream, send, leave.

pub mod chat;
pub mod error;
pub mod identity;
pub mod registry;
pub mod stream;

pub use chat::ChatSession;
pub use error::{RegistryError, SessionError, StreamError};
pub use identity::IdentityContext;
pub use registry::RoomRegistry;
pub use stream::MessageStream;
