//! Top-level notification engine that wires the collaborators together.

use std::sync::Arc;

use tracing::info;

use medhub_cache::CacheManager;
use medhub_core::config::{AppConfig, NotificationsConfig};
use medhub_core::result::AppResult;
use medhub_core::traits::cache::CacheProvider;
use medhub_core::types::SubjectId;
use medhub_entity::user::Role;

use crate::feed::FeedStore;
use crate::read_sync::ReadFlagWriter;
use crate::session::{SessionDeps, SessionRegistry, SubjectSession};
use crate::source::EventSource;
use crate::subject::SubjectKey;
use crate::transport::ChangeFeed;

/// Entry point of the embedded notification subsystem.
///
/// The host supplies the record-store adapters; the engine owns the
/// cache and the per-role sessions.
#[derive(Clone)]
pub struct NotificationEngine {
    /// Per-role sessions.
    pub sessions: Arc<SessionRegistry>,
    /// Cache backing the feeds.
    cache: Arc<dyn CacheProvider>,
}

impl std::fmt::Debug for NotificationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationEngine").finish()
    }
}

impl NotificationEngine {
    /// Build the engine from configuration, connecting the configured cache.
    pub async fn new(
        config: &AppConfig,
        source: Arc<dyn EventSource>,
        changes: Arc<dyn ChangeFeed>,
        flags: Arc<dyn ReadFlagWriter>,
    ) -> AppResult<Self> {
        let cache = CacheManager::new(&config.cache).await?;
        Ok(Self::with_cache(
            Arc::new(cache),
            config.notifications.clone(),
            source,
            changes,
            flags,
        ))
    }

    /// Build the engine around an existing cache provider.
    pub fn with_cache(
        cache: Arc<dyn CacheProvider>,
        config: NotificationsConfig,
        source: Arc<dyn EventSource>,
        changes: Arc<dyn ChangeFeed>,
        flags: Arc<dyn ReadFlagWriter>,
    ) -> Self {
        info!(
            poll_interval_s = config.poll_interval_seconds,
            push = config.push_enabled,
            "Notification engine initialized"
        );
        let deps = SessionDeps {
            store: FeedStore::new(cache.clone()),
            source,
            changes,
            flags,
            config,
        };
        Self {
            sessions: Arc::new(SessionRegistry::new(deps)),
            cache,
        }
    }

    /// Start (or return) the session of `subject_id` acting as `role`.
    pub async fn activate(&self, role: Role, subject_id: SubjectId) -> Arc<SubjectSession> {
        self.sessions.activate(SubjectKey::new(role, subject_id)).await
    }

    /// The running session of a role.
    pub async fn session(&self, role: Role) -> Option<Arc<SubjectSession>> {
        self.sessions.get(role).await
    }

    /// Stop a role's session, keeping its cached feed.
    pub async fn deactivate(&self, role: Role) -> bool {
        self.sessions.deactivate(role).await
    }

    /// Tear down every session and evict their cached feeds.
    pub async fn logout(&self) {
        self.sessions.logout().await;
    }

    /// Whether the feed cache answers.
    pub async fn health_check(&self) -> bool {
        self.cache.health_check().await.unwrap_or(false)
    }

    /// Stop every session, keeping cached feeds.
    pub async fn shutdown(&self) {
        info!("Shutting down notification engine");
        self.sessions.shutdown_all().await;
    }
}
