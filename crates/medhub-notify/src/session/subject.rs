//! One running subject session: feed, transports and read sync.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use medhub_core::config::NotificationsConfig;
use medhub_entity::DomainRecords;

use crate::feed::{FeedStore, FeedView, SubjectFeed};
use crate::read_sync::{ReadFlagWriter, ReadSyncQueue};
use crate::rules::{ReminderPolicy, RuleEngine};
use crate::source::EventSource;
use crate::subject::SubjectKey;
use crate::transport::poll::absorb;
use crate::transport::{ChangeFeed, Poller, PushListener};

/// How long teardown waits for queued read-flag batches to drain.
const READ_SYNC_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a cancelled transport may take to release its subscriptions.
const TRANSPORT_STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Collaborators shared by every session of a runtime.
#[derive(Debug, Clone)]
pub struct SessionDeps {
    /// Durable feed storage.
    pub store: FeedStore,
    /// Snapshot reads.
    pub source: Arc<dyn EventSource>,
    /// Real-time change channel.
    pub changes: Arc<dyn ChangeFeed>,
    /// Backend read-flag updates.
    pub flags: Arc<dyn ReadFlagWriter>,
    /// Detection and delivery settings.
    pub config: NotificationsConfig,
}

#[derive(Debug, Default)]
struct SessionTasks {
    transports: Vec<JoinHandle<()>>,
    read_sync: Option<JoinHandle<()>>,
}

/// The runtime binding of one subject to its feed and background tasks.
///
/// Public operations never fail towards the caller; degraded paths are
/// logged.
#[derive(Debug)]
pub struct SubjectSession {
    key: SubjectKey,
    feed: Arc<SubjectFeed>,
    engine: RuleEngine,
    source: Arc<dyn EventSource>,
    read_sync: ReadSyncQueue,
    cancel: CancellationToken,
    tasks: Mutex<SessionTasks>,
}

impl SubjectSession {
    /// Open the subject's feed and start its transports.
    pub async fn start(key: SubjectKey, deps: &SessionDeps) -> Arc<Self> {
        let feed = SubjectFeed::open(key, deps.store.clone()).await;
        let engine = RuleEngine::new(key, ReminderPolicy::from_config(&deps.config));
        let cancel = CancellationToken::new();

        let (read_sync, read_sync_task) = ReadSyncQueue::spawn(
            key,
            deps.flags.clone(),
            deps.config.read_sync_queue_size,
            cancel.clone(),
        );

        let mut transports = Vec::new();
        if deps.config.push_enabled {
            let listener = PushListener::new(
                engine.clone(),
                feed.clone(),
                deps.changes.clone(),
                deps.config.resubscribe_backoff(),
            );
            transports.push(tokio::spawn(listener.run(cancel.clone())));
        }
        if deps.config.polling_enabled {
            let poller = Poller::new(
                engine.clone(),
                feed.clone(),
                deps.source.clone(),
                deps.config.poll_interval(),
            );
            transports.push(tokio::spawn(poller.run(cancel.clone())));
        }

        tracing::info!(
            subject = %key,
            entries = feed.snapshot().len(),
            push = deps.config.push_enabled,
            polling = deps.config.polling_enabled,
            "Subject session started"
        );

        Arc::new(Self {
            key,
            feed,
            engine,
            source: deps.source.clone(),
            read_sync,
            cancel,
            tasks: Mutex::new(SessionTasks {
                transports,
                read_sync: Some(read_sync_task),
            }),
        })
    }

    /// The subject this session serves.
    pub fn key(&self) -> &SubjectKey {
        &self.key
    }

    /// Current feed, newest first.
    pub fn feed(&self) -> FeedView {
        self.feed.snapshot()
    }

    /// Reactive view of the feed.
    pub fn watch_feed(&self) -> watch::Receiver<FeedView> {
        self.feed.subscribe()
    }

    /// Number of unread entries.
    pub fn unread_count(&self) -> usize {
        self.feed.unread_count()
    }

    /// Mark everything read locally and queue the backend flag flips.
    pub async fn mark_all_read(&self) {
        let batch = self.feed.mark_all_read().await;
        self.read_sync.enqueue(batch);
    }

    /// Mark one entry read locally and queue its backend flag flip.
    pub async fn mark_read(&self, id: &str) {
        let batch = self.feed.mark_read(id).await;
        self.read_sync.enqueue(batch);
    }

    /// Detect against a snapshot the caller already holds and merge the
    /// result. Returns the number of entries added.
    pub async fn on_new_events(&self, snapshot: &DomainRecords) -> usize {
        absorb(&self.key, &self.engine, &self.feed, snapshot).await
    }

    /// Fetch a fresh snapshot now instead of waiting for the next poll.
    pub async fn refresh(&self) -> usize {
        match self.source.fetch_domain_records(&self.key).await {
            Ok(snapshot) => self.on_new_events(&snapshot).await,
            Err(e) => {
                tracing::warn!(subject = %self.key, error = %e, "Refresh failed");
                0
            }
        }
    }

    /// Whether the session is still running.
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Stop every task and close the feed. Idempotent.
    ///
    /// Transports still running after a short grace period are aborted;
    /// queued read-flag batches get a bounded chance to drain.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.feed.close().await;

        let mut tasks = self.tasks.lock().await;
        for mut handle in tasks.transports.drain(..) {
            if tokio::time::timeout(TRANSPORT_STOP_TIMEOUT, &mut handle).await.is_err() {
                handle.abort();
            }
        }
        if let Some(handle) = tasks.read_sync.take() {
            if tokio::time::timeout(READ_SYNC_DRAIN_TIMEOUT, handle).await.is_err() {
                tracing::warn!(subject = %self.key, "Read sync did not drain before teardown");
            }
        }

        tracing::info!(subject = %self.key, "Subject session stopped");
    }
}
