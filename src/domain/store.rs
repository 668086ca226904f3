//! Backing store contract.
//!
//! The durable store is an external, subscribable hierarchical key-value
//! service. The domain layer owns this trait (dependency inversion);
//! concrete implementations live in the infrastructure layer and the
//! components above never depend on them directly.

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::mpsc;

use super::{error::StoreError, value_object::RoomCode};

/// Field marker the store replaces with its own clock at durable-write
/// time. Written as the object `{".sv": "timestamp"}`, mirroring the
/// realtime-database sentinel convention.
pub const SERVER_VALUE_KEY: &str = ".sv";

/// Build a server-timestamp placeholder value.
///
/// Any top-level field of a written value equal to this placeholder is
/// resolved by the store to Unix milliseconds at write time. Client clocks
/// never produce ordering keys.
pub fn server_timestamp() -> Value {
    json!({ SERVER_VALUE_KEY: "timestamp" })
}

/// Check whether a value is the server-timestamp placeholder.
pub fn is_server_timestamp(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|o| o.get(SERVER_VALUE_KEY))
        .and_then(Value::as_str)
        == Some("timestamp")
}

/// Path of a room record.
pub fn room_path(code: &RoomCode) -> String {
    format!("rooms/{code}")
}

/// Path of a room's message collection.
pub fn messages_path(code: &RoomCode) -> String {
    format!("rooms/{code}/messages")
}

/// Outcome of a conditional create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was written; the path did not exist before
    Created,
    /// The path already held a value; nothing was written
    AlreadyExists,
}

/// Full contents of a collection: `(entry id, value)` pairs in no
/// particular order. Ordering is derived by the consumer.
pub type Snapshot = Vec<(String, Value)>;

/// A live snapshot subscription on one collection path.
///
/// Yields the full current collection contents immediately after
/// establishment and again after every change beneath the path, never an
/// incremental diff. Release is guaranteed: [`close`](Self::close) is
/// idempotent and also runs on drop, so a subscription cannot outlive its
/// handle on any exit path.
pub struct SnapshotSubscription {
    rx: mpsc::UnboundedReceiver<Snapshot>,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl SnapshotSubscription {
    /// Build a subscription from its notification channel and the
    /// store-side cancellation hook.
    pub fn new(rx: mpsc::UnboundedReceiver<Snapshot>, cancel: Box<dyn FnOnce() + Send>) -> Self {
        Self {
            rx,
            cancel: Some(cancel),
        }
    }

    /// Wait for the next snapshot. Returns `None` once the subscription is
    /// closed and all pending snapshots have been drained.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }

    /// Release the subscription. Safe to call multiple times.
    pub fn close(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for SnapshotSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SnapshotSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// The durable, subscribable hierarchical key-value service of record.
///
/// Consumed, not implemented, by the session layer; the in-memory
/// implementation in the infrastructure layer defines the reference
/// semantics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Check whether any value exists at or beneath `path`.
    async fn exists(&self, path: &str) -> Result<bool, StoreError>;

    /// Read the value at `path`, or `None` when absent.
    async fn read(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Write `value` at `path` only if the path is currently absent.
    /// Server-timestamp placeholders in `value` are resolved on write.
    async fn write_if_absent(
        &self,
        path: &str,
        value: Value,
    ) -> Result<WriteOutcome, StoreError>;

    /// Append `value` to the collection at `collection_path`. The store
    /// assigns the returned entry id and resolves server-timestamp
    /// placeholders at durable-write time.
    async fn append(&self, collection_path: &str, value: Value) -> Result<String, StoreError>;

    /// Establish a live snapshot subscription on `collection_path`.
    async fn subscribe(&self, collection_path: &str) -> Result<SnapshotSubscription, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_timestamp_round_trip() {
        // given:
        let placeholder = server_timestamp();

        // then:
        assert!(is_server_timestamp(&placeholder));
        assert!(!is_server_timestamp(&json!(1000)));
        assert!(!is_server_timestamp(&json!({ ".sv": "increment" })));
    }

    #[test]
    fn test_paths() {
        // given:
        let code = RoomCode::parse("AB12CD").unwrap();

        // then:
        assert_eq!(room_path(&code), "rooms/AB12CD");
        assert_eq!(messages_path(&code), "rooms/AB12CD/messages");
    }

    #[tokio::test]
    async fn test_subscription_close_is_idempotent() {
        // given: a subscription whose cancel hook counts invocations
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let cancelled = Arc::new(AtomicUsize::new(0));
        let counter = cancelled.clone();
        let (_tx, rx) = mpsc::unbounded_channel();
        let mut subscription =
            SnapshotSubscription::new(rx, Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        // when: closed twice, then dropped
        subscription.close();
        subscription.close();
        drop(subscription);

        // then: the cancel hook ran exactly once
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }
}
