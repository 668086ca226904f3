//! Shared fixtures for session integration tests.

use std::sync::Arc;
use std::time::Duration;

use masschat::{
    ChatSession, IdentityContext, InMemoryBackingStore,
    domain::{ChatMessage, DisplayName, Identity, UserId},
};
use tokio::sync::watch;

/// Build a signed-in session over the given shared store.
pub fn session_for(store: &Arc<InMemoryBackingStore>, user_id: &str, name: &str) -> ChatSession {
    let identity = Identity::new(
        UserId::new(user_id.to_string()).expect("valid user id"),
        DisplayName::new(name.to_string()).expect("valid display name"),
    );
    ChatSession::new(store.clone(), IdentityContext::signed_in(identity))
}

/// Wait until the live view holds exactly `len` messages, or panic after
/// a grace period. Returns the observed sequence.
pub async fn wait_for_len(
    rx: &mut watch::Receiver<Vec<ChatMessage>>,
    len: usize,
) -> Vec<ChatMessage> {
    let deadline = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if rx.borrow().len() >= len {
                return rx.borrow().clone();
            }
            rx.changed().await.expect("message stream closed while waiting");
        }
    });
    deadline
        .await
        .unwrap_or_else(|_| panic!("live view never reached {len} messages"))
}
