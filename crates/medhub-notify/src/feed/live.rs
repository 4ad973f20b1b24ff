//! The live, reactive feed of one subject.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use medhub_entity::notification::NotificationEvent;

use crate::read_sync::{self, ReadStateBatch};
use crate::subject::SubjectKey;

use super::merge;
use super::store::FeedStore;

/// Shared, immutable view of the feed published to observers.
pub type FeedView = Arc<Vec<NotificationEvent>>;

#[derive(Debug)]
struct FeedState {
    events: Vec<NotificationEvent>,
    closed: bool,
}

/// Authoritative feed of one subject.
///
/// All writes are serialized by an async mutex and persisted while it is
/// held, so the cache never sees writes out of order. Every change is
/// published on a `watch` channel. Once closed, the feed discards writes.
#[derive(Debug)]
pub struct SubjectFeed {
    key: SubjectKey,
    store: FeedStore,
    state: Mutex<FeedState>,
    tx: watch::Sender<FeedView>,
}

impl SubjectFeed {
    /// Open a subject's feed, seeded from the cache.
    pub async fn open(key: SubjectKey, store: FeedStore) -> Arc<Self> {
        let events = store.load(&key).await;
        let (tx, _) = watch::channel(Arc::new(events.clone()));
        Arc::new(Self {
            key,
            store,
            state: Mutex::new(FeedState {
                events,
                closed: false,
            }),
            tx,
        })
    }

    /// The subject the feed is bound to.
    pub fn key(&self) -> &SubjectKey {
        &self.key
    }

    /// Current contents, newest first.
    pub fn snapshot(&self) -> FeedView {
        self.tx.borrow().clone()
    }

    /// Observe every future change.
    pub fn subscribe(&self) -> watch::Receiver<FeedView> {
        self.tx.subscribe()
    }

    /// Unread entries in the current contents.
    pub fn unread_count(&self) -> usize {
        merge::unread_count(&self.tx.borrow())
    }

    /// Ids currently in the feed.
    pub async fn existing_ids(&self) -> HashSet<String> {
        merge::ids(&self.state.lock().await.events)
    }

    /// Merge newly detected events.
    ///
    /// `writer` is the subject the producing task was created for; a
    /// mismatch or a closed feed drops the write. Returns the number of
    /// entries added.
    pub async fn merge(&self, writer: &SubjectKey, events: Vec<NotificationEvent>) -> usize {
        if events.is_empty() {
            return 0;
        }
        let mut state = self.state.lock().await;
        if state.closed || *writer != self.key {
            debug!(feed = %self.key, %writer, "Discarding write to inactive feed");
            return 0;
        }

        let added = merge::merge(&mut state.events, events);
        if added > 0 {
            debug!(subject = %self.key, added, total = state.events.len(), "Merged notifications");
            self.commit(&state.events).await;
        }
        added
    }

    /// Mark every entry read, returning the backend flags to flip.
    pub async fn mark_all_read(&self) -> ReadStateBatch {
        let mut state = self.state.lock().await;
        if state.closed {
            return ReadStateBatch::new();
        }
        let had_unread = state.events.iter().any(|e| e.is_unread());
        let batch = read_sync::mark_all_read(&mut state.events, self.key.role.read_flag());
        if had_unread {
            self.commit(&state.events).await;
        }
        batch
    }

    /// Mark one entry read, returning the backend flags to flip.
    pub async fn mark_read(&self, id: &str) -> ReadStateBatch {
        let mut state = self.state.lock().await;
        if state.closed {
            return ReadStateBatch::new();
        }
        let was_unread = state.events.iter().any(|e| e.id == id && e.is_unread());
        let batch = read_sync::mark_read(&mut state.events, id, self.key.role.read_flag());
        if was_unread {
            self.commit(&state.events).await;
        }
        batch
    }

    /// Stop accepting writes. Idempotent.
    pub async fn close(&self) {
        self.state.lock().await.closed = true;
    }

    /// Whether the feed has been closed.
    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    async fn commit(&self, events: &[NotificationEvent]) {
        self.tx.send_replace(Arc::new(events.to_vec()));
        if let Err(e) = self.store.persist(&self.key, events).await {
            // The next successful write persists the whole feed again.
            warn!(subject = %self.key, error = %e, "Failed to persist feed");
        }
    }
}
