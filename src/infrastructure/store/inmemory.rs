//! In-memory BackingStore implementation.
//!
//! A complete in-process implementation of the domain's [`BackingStore`]
//! trait: a path-keyed map with conditional creates, append-generated ids,
//! a monotonic server clock for timestamp resolution, and per-path
//! snapshot fan-out to subscribers on every write.
//!
//! Used by the demo binary and the integration tests; also serves as the
//! reference for store semantics a remote implementation must match.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::domain::{
    Snapshot, SnapshotSubscription, StoreError, WriteOutcome,
    store::{BackingStore, is_server_timestamp},
};
use crate::time::now_millis;

#[derive(Default)]
struct Inner {
    /// Full path -> stored value. A collection's entries are the direct
    /// children of its path.
    entries: BTreeMap<String, Value>,
    /// Subscribed collection path -> subscriber id -> notification channel
    subscribers: HashMap<String, HashMap<u64, mpsc::UnboundedSender<Snapshot>>>,
    next_subscriber_id: u64,
    /// Last issued server-clock reading, strictly increasing so that rapid
    /// appends never share an ordering key
    clock: i64,
}

/// In-process implementation of the backing store contract.
///
/// Cheap to clone; clones share the same state, so one instance can be
/// handed to any number of sessions.
#[derive(Clone, Default)]
pub struct InMemoryBackingStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryBackingStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // The lock is never held across an await; poisoning only follows a
        // panic elsewhere, so propagating the panic is the right move.
        self.inner.lock().expect("store state poisoned")
    }
}

impl Inner {
    /// Next server-clock reading in Unix milliseconds.
    fn server_now(&mut self) -> i64 {
        self.clock = now_millis().max(self.clock + 1);
        self.clock
    }

    /// Replace top-level server-timestamp placeholders with `now`.
    fn resolve_placeholders(value: &mut Value, now: i64) {
        if let Some(fields) = value.as_object_mut() {
            for field in fields.values_mut() {
                if is_server_timestamp(field) {
                    *field = Value::from(now);
                }
            }
        }
    }

    /// Full contents of the collection at `path`: direct children only.
    fn snapshot_of(&self, path: &str) -> Snapshot {
        let prefix = format!("{path}/");
        self.entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| !key[prefix.len()..].contains('/'))
            .map(|(key, value)| (key[prefix.len()..].to_string(), value.clone()))
            .collect()
    }

    /// Fan out fresh snapshots to every subscriber whose path is the
    /// written path or an ancestor of it.
    fn notify(&mut self, written_path: &str) {
        let affected: Vec<String> = self
            .subscribers
            .keys()
            .filter(|p| written_path == p.as_str() || written_path.starts_with(&format!("{p}/")))
            .cloned()
            .collect();
        for path in affected {
            let snapshot = self.snapshot_of(&path);
            if let Some(subs) = self.subscribers.get_mut(&path) {
                // Drop subscribers whose receiving side has gone away.
                subs.retain(|_, tx| tx.send(snapshot.clone()).is_ok());
            }
        }
    }
}

#[async_trait]
impl BackingStore for InMemoryBackingStore {
    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        let inner = self.lock();
        let prefix = format!("{path}/");
        Ok(inner.entries.contains_key(path)
            || inner
                .entries
                .range(prefix.clone()..)
                .next()
                .is_some_and(|(key, _)| key.starts_with(&prefix)))
    }

    async fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.lock().entries.get(path).cloned())
    }

    async fn write_if_absent(
        &self,
        path: &str,
        mut value: Value,
    ) -> Result<WriteOutcome, StoreError> {
        let mut inner = self.lock();
        if inner.entries.contains_key(path) {
            return Ok(WriteOutcome::AlreadyExists);
        }
        let now = inner.server_now();
        Inner::resolve_placeholders(&mut value, now);
        inner.entries.insert(path.to_string(), value);
        inner.notify(path);
        tracing::debug!(path, "created");
        Ok(WriteOutcome::Created)
    }

    async fn append(&self, collection_path: &str, mut value: Value) -> Result<String, StoreError> {
        let mut inner = self.lock();
        let id = uuid::Uuid::new_v4().to_string();
        let now = inner.server_now();
        Inner::resolve_placeholders(&mut value, now);
        let path = format!("{collection_path}/{id}");
        inner.entries.insert(path.clone(), value);
        inner.notify(&path);
        tracing::debug!(path, "appended");
        Ok(id)
    }

    async fn subscribe(
        &self,
        collection_path: &str,
    ) -> Result<SnapshotSubscription, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscriber_id = {
            let mut inner = self.lock();
            let id = inner.next_subscriber_id;
            inner.next_subscriber_id += 1;

            // Initial snapshot is delivered immediately on establishment.
            let initial = inner.snapshot_of(collection_path);
            let _ = tx.send(initial);

            inner
                .subscribers
                .entry(collection_path.to_string())
                .or_default()
                .insert(id, tx);
            id
        };

        let registry = self.inner.clone();
        let path = collection_path.to_string();
        let cancel = Box::new(move || {
            if let Ok(mut inner) = registry.lock() {
                if let Some(subs) = inner.subscribers.get_mut(&path) {
                    subs.remove(&subscriber_id);
                    if subs.is_empty() {
                        inner.subscribers.remove(&path);
                    }
                }
            }
        });
        Ok(SnapshotSubscription::new(rx, cancel))
    }
}
