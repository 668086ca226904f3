//! The user-facing room experience.
//!
//! Composes the registry, the message stream, and the identity context.
//! State machine: `NoRoom -> (create | join) -> InRoom -> leave -> NoRoom`.
//! A failed create or join leaves the session in `NoRoom`; there is no
//! direct `InRoom -> InRoom` transition, switching rooms is
//! leave-then-join.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{BackingStore, ChatMessage, RoomCode};

use super::{
    error::SessionError, identity::IdentityContext, registry::RoomRegistry, stream::MessageStream,
};

/// One user's chat session.
///
/// The store handle is injected by the process entry point, which owns its
/// lifecycle; the session only borrows it.
pub struct ChatSession {
    identity: IdentityContext,
    registry: RoomRegistry,
    store: Arc<dyn BackingStore>,
    stream: Option<MessageStream>,
}

impl ChatSession {
    /// Create a session over the given store and identity.
    pub fn new(store: Arc<dyn BackingStore>, identity: IdentityContext) -> Self {
        Self {
            identity,
            registry: RoomRegistry::new(store.clone()),
            store,
            stream: None,
        }
    }

    /// Create a new room and enter it.
    ///
    /// On success the session holds an open message stream for the new
    /// room. On any failure the session stays in `NoRoom`.
    pub async fn create_room(&mut self) -> Result<RoomCode, SessionError> {
        self.ensure_no_room()?;
        let owner = self
            .identity
            .current_identity()
            .ok_or(SessionError::NotSignedIn)?
            .clone();

        let room = self.registry.create(&owner).await?;
        let stream = MessageStream::open(self.store.clone(), room.id.clone()).await?;
        self.stream = Some(stream);
        Ok(room.id)
    }

    /// Join an existing room by code.
    ///
    /// On `RoomNotFound` no stream is opened and the session stays in
    /// `NoRoom`.
    pub async fn join_room(&mut self, code: &str) -> Result<RoomCode, SessionError> {
        self.ensure_no_room()?;
        if self.identity.current_identity().is_none() {
            return Err(SessionError::NotSignedIn);
        }

        let room = self.registry.resolve(code).await?;
        let stream = MessageStream::open(self.store.clone(), room.id.clone()).await?;
        self.stream = Some(stream);
        Ok(room.id)
    }

    /// Send a message into the active room.
    ///
    /// A no-op (not even attempted) when no stream is active or the text
    /// is blank.
    pub async fn send_message(&self, text: &str) -> Result<(), SessionError> {
        let Some(stream) = &self.stream else {
            return Ok(());
        };
        if text.trim().is_empty() {
            return Ok(());
        }
        let author = self
            .identity
            .current_identity()
            .ok_or(SessionError::NotSignedIn)?;
        stream.send(author, text).await?;
        Ok(())
    }

    /// Leave the active room, releasing its subscription.
    ///
    /// Best effort: always succeeds, and calling it with no active room
    /// (including right after a previous leave) does nothing.
    pub fn leave_room(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.close();
        }
    }

    /// The active room's code, if any.
    pub fn current_room(&self) -> Option<&RoomCode> {
        self.stream.as_ref().map(MessageStream::room_id)
    }

    /// A handle on the active room's live, ordered message sequence.
    pub fn messages(&self) -> Option<watch::Receiver<Vec<ChatMessage>>> {
        self.stream.as_ref().map(MessageStream::messages)
    }

    fn ensure_no_room(&self) -> Result<(), SessionError> {
        match self.current_room() {
            Some(code) => Err(SessionError::AlreadyInRoom(code.as_str().to_string())),
            None => Ok(()),
        }
    }
}
