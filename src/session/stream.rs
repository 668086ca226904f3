//! Live, ordered view of one room's messages.
//!
//! The backing store notifies with full collection snapshots, never
//! incremental diffs. On every notification the stream re-derives the
//! ascending `(sent_at, id)` sequence from scratch and publishes it
//! through a watch channel, so consumers always observe a complete,
//! consistent view and never a partial apply.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::{
    BackingStore, ChatMessage, Identity, MessageText, RoomCode, Snapshot,
    store::messages_path,
};
use crate::infrastructure::dto::MessageRecord;

use super::error::StreamError;

/// Per-room message stream: an ordered local mirror plus one live
/// subscription.
///
/// The locally held sequence is a cache of everything the store has
/// reported so far, never the source of truth. At most one live
/// subscription exists per stream instance; [`close`](Self::close) is
/// idempotent and release is also guaranteed on drop.
pub struct MessageStream {
    room_id: RoomCode,
    store: Arc<dyn BackingStore>,
    messages: watch::Receiver<Vec<ChatMessage>>,
    pump: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for MessageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStream")
            .field("room_id", &self.room_id)
            .finish_non_exhaustive()
    }
}

impl MessageStream {
    /// Establish a live subscription to the room's message collection.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::SubscriptionFailed`] when the initial
    /// subscription cannot be established; nothing is leaked on that path.
    pub async fn open(
        store: Arc<dyn BackingStore>,
        room_id: RoomCode,
    ) -> Result<Self, StreamError> {
        let mut subscription = store
            .subscribe(&messages_path(&room_id))
            .await
            .map_err(StreamError::SubscriptionFailed)?;

        let (tx, rx) = watch::channel(Vec::new());
        let pump_room = room_id.clone();
        // The subscription is owned by the pump task; aborting the task
        // drops it, which unsubscribes.
        let pump = tokio::spawn(async move {
            while let Some(snapshot) = subscription.next().await {
                let ordered = order_snapshot(&pump_room, snapshot);
                if tx.send(ordered).is_err() {
                    // Every consumer is gone; stop pumping.
                    break;
                }
            }
        });

        tracing::info!(room = %room_id, "message stream opened");
        Ok(Self {
            room_id,
            store,
            messages: rx,
            pump: Some(pump),
        })
    }

    /// The room this stream is bound to.
    pub fn room_id(&self) -> &RoomCode {
        &self.room_id
    }

    /// A handle on the live, ordered message sequence.
    ///
    /// Each published value replaces the previous one atomically from the
    /// consumer's point of view.
    pub fn messages(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.messages.clone()
    }

    /// Append a new message authored by `author`.
    ///
    /// Blank or over-long text is rejected locally with zero store calls.
    /// There is no optimistic local insert: the send reappears through the
    /// subscription's next snapshot with its store-assigned `sent_at`, so
    /// ordering is bound to server time and never to the client clock.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidText`] on local rejection and
    /// [`StreamError::SendFailed`] when the store write does not persist;
    /// the last-known-good snapshot is retained either way.
    pub async fn send(&self, author: &Identity, text: &str) -> Result<(), StreamError> {
        let text = MessageText::new(text.to_string()).map_err(StreamError::InvalidText)?;
        let record = MessageRecord::pending(author, &text);
        let id = self
            .store
            .append(&messages_path(&self.room_id), record)
            .await
            .map_err(|e| {
                tracing::warn!(room = %self.room_id, error = %e, "message send failed");
                StreamError::SendFailed(e)
            })?;
        tracing::debug!(room = %self.room_id, message = %id, "message appended");
        Ok(())
    }

    /// Release the subscription. Safe to call multiple times; also runs on
    /// drop.
    pub fn close(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
            tracing::info!(room = %self.room_id, "message stream closed");
        }
    }
}

impl Drop for MessageStream {
    fn drop(&mut self) {
        self.close();
    }
}

/// Re-derive the ordered sequence from a full snapshot.
///
/// Entries that fail decoding or domain validation are skipped with a
/// warning rather than corrupting the view. The result is ascending by
/// `(sent_at, id)` and duplicate-free by id.
fn order_snapshot(room: &RoomCode, snapshot: Snapshot) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = snapshot
        .into_iter()
        .filter_map(|(id, value)| match MessageRecord::decode(value) {
            Ok(record) => match record.into_message(id.clone()) {
                Ok(message) => Some(message),
                Err(e) => {
                    tracing::warn!(%room, entry = %id, error = %e, "skipping invalid message");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(%room, entry = %id, error = %e, "skipping undecodable message");
                None
            }
        })
        .collect();
    messages.sort_by(|a, b| a.ordering(b));
    messages.dedup_by(|a, b| a.id == b.id);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, MockBackingStore, StoreError, UserId};
    use serde_json::json;

    fn author() -> Identity {
        Identity::new(
            UserId::new("u1".to_string()).unwrap(),
            DisplayName::new("Alice".to_string()).unwrap(),
        )
    }

    fn room() -> RoomCode {
        RoomCode::parse("AB12CD").unwrap()
    }

    fn entry(id: &str, text: &str, sent_at: i64) -> (String, serde_json::Value) {
        (
            id.to_string(),
            json!({
                "author_id": "u1",
                "author_name": "Alice",
                "text": text,
                "sent_at": sent_at,
            }),
        )
    }

    #[test]
    fn test_order_snapshot_sorts_by_sent_at_then_id() {
        // given: a snapshot in arbitrary store order with one tie
        let snapshot = vec![
            entry("mc", "third", 3000),
            entry("mb", "tie-b", 1000),
            entry("ma", "tie-a", 1000),
        ];

        // when:
        let ordered = order_snapshot(&room(), snapshot);

        // then: ascending (sent_at, id)
        let ids: Vec<_> = ordered.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["ma", "mb", "mc"]);
    }

    #[test]
    fn test_order_snapshot_skips_invalid_entries() {
        // given: one good entry, one undecodable, one failing validation
        let snapshot = vec![
            entry("ok", "hello", 1000),
            ("bad".to_string(), json!({ "nonsense": true })),
            entry("blank", "   ", 2000),
        ];

        // when:
        let ordered = order_snapshot(&room(), snapshot);

        // then: only the valid entry survives
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].text.as_str(), "hello");
    }

    #[tokio::test]
    async fn test_open_subscription_failure() {
        // given: a store that refuses the subscription
        let mut store = MockBackingStore::new();
        store
            .expect_subscribe()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("offline".to_string())));

        // when:
        let result = MessageStream::open(Arc::new(store), room()).await;

        // then:
        assert!(matches!(
            result.unwrap_err(),
            StreamError::SubscriptionFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_send_blank_text_makes_zero_store_calls() {
        // given: a store expecting no append at all
        let mut store = MockBackingStore::new();
        store.expect_subscribe().times(1).returning(|_| {
            let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
            Ok(crate::domain::SnapshotSubscription::new(rx, Box::new(|| {})))
        });
        let stream = MessageStream::open(Arc::new(store), room()).await.unwrap();

        // when:
        let result = stream.send(&author(), "   ").await;

        // then: rejected locally
        assert!(matches!(result.unwrap_err(), StreamError::InvalidText(_)));
    }

    #[tokio::test]
    async fn test_send_store_failure_maps_to_send_failed() {
        // given: a store whose append fails
        let mut store = MockBackingStore::new();
        store.expect_subscribe().times(1).returning(|_| {
            let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
            Ok(crate::domain::SnapshotSubscription::new(rx, Box::new(|| {})))
        });
        store
            .expect_append()
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("offline".to_string())));
        let stream = MessageStream::open(Arc::new(store), room()).await.unwrap();

        // when:
        let result = stream.send(&author(), "hello").await;

        // then: reported, never swallowed; local view untouched
        assert!(matches!(result.unwrap_err(), StreamError::SendFailed(_)));
        assert!(stream.messages().borrow().is_empty());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        // given:
        let mut store = MockBackingStore::new();
        store.expect_subscribe().times(1).returning(|_| {
            let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
            Ok(crate::domain::SnapshotSubscription::new(rx, Box::new(|| {})))
        });
        let mut stream = MessageStream::open(Arc::new(store), room()).await.unwrap();

        // when / then: closing twice and dropping never panics
        stream.close();
        stream.close();
        drop(stream);
    }
}
