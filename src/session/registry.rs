//! Room creation and resolution against the backing store.

use std::sync::Arc;

use crate::domain::{
    BackingStore, Identity, Room, RoomCode, RoomCodeFactory, StoreError, WriteOutcome,
    store::room_path,
};
use crate::infrastructure::dto::RoomRecord;

use super::error::RegistryError;

/// Retry budget for the generate/check/create loop.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Creates room records and resolves join requests.
///
/// The store handle is passed in explicitly; the registry never owns the
/// connection lifecycle.
pub struct RoomRegistry {
    store: Arc<dyn BackingStore>,
}

impl RoomRegistry {
    /// Create a new registry over the given store.
    pub fn new(store: Arc<dyn BackingStore>) -> Self {
        Self { store }
    }

    /// Create a new room owned by `owner`.
    ///
    /// Repeatedly generates a candidate code, checks existence, and
    /// performs a conditional create on the first free candidate. Code
    /// generation and check-then-write are not atomic against the store,
    /// so a lost race surfaces as `AlreadyExists` and costs one retry.
    /// Exactly one durable write happens on success.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CreationExhausted`] when no free code is
    /// found within [`MAX_CODE_ATTEMPTS`] attempts.
    pub async fn create(&self, owner: &Identity) -> Result<Room, RegistryError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = RoomCodeFactory::generate()?;
            let path = room_path(&code);

            if self.store.exists(&path).await? {
                tracing::debug!(%code, attempt, "room code collision, regenerating");
                continue;
            }

            match self
                .store
                .write_if_absent(&path, RoomRecord::pending(owner))
                .await?
            {
                WriteOutcome::Created => {
                    tracing::info!(%code, owner = %owner.user_id, "room created");
                    return self.read_room(&code).await;
                }
                WriteOutcome::AlreadyExists => {
                    // A concurrent creator claimed the code between the
                    // existence check and the write.
                    tracing::debug!(%code, attempt, "room code claimed concurrently, regenerating");
                    continue;
                }
            }
        }
        Err(RegistryError::CreationExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Resolve a join request to an existing room.
    ///
    /// The input is case-folded to the generator's uppercase convention
    /// before lookup. Performs zero writes.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RoomNotFound`] when the code does not
    /// resolve to a room; malformed codes cannot name a room and report
    /// the same way.
    pub async fn resolve(&self, input: &str) -> Result<Room, RegistryError> {
        let Ok(code) = RoomCode::parse(input) else {
            return Err(RegistryError::RoomNotFound(
                input.trim().to_uppercase(),
            ));
        };
        self.read_room(&code).await
    }

    /// Read and decode the room record at `code`.
    async fn read_room(&self, code: &RoomCode) -> Result<Room, RegistryError> {
        match self.store.read(&room_path(code)).await? {
            None => Err(RegistryError::RoomNotFound(code.as_str().to_string())),
            Some(value) => {
                let record = RoomRecord::decode(value).map_err(StoreError::from)?;
                Ok(record.into_room(code.clone())?)
            }
        }
    }
}
