//! Durable per-subject feed storage on top of a [`CacheProvider`].

use std::sync::Arc;

use tracing::{debug, warn};

use medhub_cache::keys;
use medhub_core::result::AppResult;
use medhub_core::traits::cache::CacheProvider;
use medhub_core::types::SubjectId;
use medhub_entity::notification::NotificationEvent;
use medhub_entity::user::Role;

use crate::subject::SubjectKey;

use super::merge::dedupe;

/// Reads and writes serialized feeds under `notifications:<role>:<subject>`.
#[derive(Debug, Clone)]
pub struct FeedStore {
    cache: Arc<dyn CacheProvider>,
}

impl FeedStore {
    /// Wrap a cache provider.
    pub fn new(cache: Arc<dyn CacheProvider>) -> Self {
        Self { cache }
    }

    /// Load a subject's feed.
    ///
    /// A missing, unreadable or corrupt entry yields an empty feed; the
    /// failure is logged and never raised.
    pub async fn load(&self, subject: &SubjectKey) -> Vec<NotificationEvent> {
        let key = subject.cache_key();
        let raw = match self.cache.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(%subject, error = %e, "Feed cache unavailable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<NotificationEvent>>(&raw) {
            Ok(mut feed) => {
                let dropped = dedupe(&mut feed);
                if dropped > 0 {
                    warn!(%subject, dropped, "Dropped repeated feed entries");
                }
                debug!(%subject, len = feed.len(), "Loaded feed");
                feed
            }
            Err(e) => {
                warn!(%subject, error = %e, "Corrupt feed entry, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite a subject's feed.
    pub async fn persist(&self, subject: &SubjectKey, feed: &[NotificationEvent]) -> AppResult<()> {
        let json = serde_json::to_string(feed)?;
        self.cache.set_default(&subject.cache_key(), &json).await
    }

    /// Remove a subject's feed.
    pub async fn evict(&self, subject: &SubjectKey) -> AppResult<()> {
        self.cache.delete(&subject.cache_key()).await
    }

    /// The subject last activated for a role, if recorded.
    pub async fn active_subject(&self, role: Role) -> AppResult<Option<SubjectId>> {
        let Some(raw) = self.cache.get(&keys::active_subject(role)).await? else {
            return Ok(None);
        };
        match raw.parse::<SubjectId>() {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                warn!(%role, error = %e, "Ignoring malformed active-subject marker");
                Ok(None)
            }
        }
    }

    /// Record the subject now active for a role.
    pub async fn set_active_subject(&self, subject: &SubjectKey) -> AppResult<()> {
        self.cache
            .set_default(&keys::active_subject(subject.role), &subject.subject_id.to_string())
            .await
    }

    /// Remove every feed of a role together with its active-subject marker,
    /// including feeds of subjects no running session knows about.
    pub async fn evict_role(&self, role: Role) -> AppResult<u64> {
        self.cache.delete_pattern(&keys::role_pattern(role)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::merge::tests::event;
    use chrono::{Duration, Utc};
    use medhub_cache::memory::MemoryCacheProvider;

    fn store() -> (FeedStore, Arc<MemoryCacheProvider>) {
        let cache = Arc::new(MemoryCacheProvider::default());
        (FeedStore::new(cache.clone()), cache)
    }

    #[tokio::test]
    async fn test_persist_load_roundtrip() {
        let (store, _) = store();
        let subject = SubjectKey::new(Role::Doctor, SubjectId::new());
        let t0 = Utc::now();
        let mut read = event("b", t0 - Duration::minutes(1));
        read.read = true;
        let feed = vec![event("a", t0), read];

        store.persist(&subject, &feed).await.unwrap();
        assert_eq!(store.load(&subject).await, feed);
    }

    #[tokio::test]
    async fn test_missing_feed_is_empty() {
        let (store, _) = store();
        let subject = SubjectKey::new(Role::Patient, SubjectId::new());
        assert!(store.load(&subject).await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_feed_is_empty() {
        let (store, cache) = store();
        let subject = SubjectKey::new(Role::Seller, SubjectId::new());
        cache.set_default(&subject.cache_key(), "{not a feed").await.unwrap();
        assert!(store.load(&subject).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_drops_repeated_ids() {
        let (store, cache) = store();
        let subject = SubjectKey::new(Role::Doctor, SubjectId::new());
        let t0 = Utc::now();
        let mut seen = event("a", t0);
        seen.read = true;
        let raw = serde_json::to_string(&vec![event("a", t0), event("b", t0), seen]).unwrap();
        cache.set_default(&subject.cache_key(), &raw).await.unwrap();

        let feed = store.load(&subject).await;
        assert_eq!(feed.len(), 2);
        assert!(feed.iter().any(|e| e.id == "a" && e.read));
    }

    #[tokio::test]
    async fn test_active_marker() {
        let (store, _) = store();
        let subject = SubjectKey::new(Role::Clinic, SubjectId::new());
        assert_eq!(store.active_subject(Role::Clinic).await.unwrap(), None);

        store.set_active_subject(&subject).await.unwrap();
        assert_eq!(
            store.active_subject(Role::Clinic).await.unwrap(),
            Some(subject.subject_id)
        );
        assert_eq!(store.active_subject(Role::Doctor).await.unwrap(), None);

    }

    #[tokio::test]
    async fn test_evict_role_clears_feeds_and_marker() {
        let (store, _) = store();
        let current = SubjectKey::new(Role::Doctor, SubjectId::new());
        let leftover = SubjectKey::new(Role::Doctor, SubjectId::new());
        let other_role = SubjectKey::new(Role::Patient, SubjectId::new());
        let feed = vec![event("a", Utc::now())];
        for key in [&current, &leftover, &other_role] {
            store.persist(key, &feed).await.unwrap();
        }
        store.set_active_subject(&current).await.unwrap();

        assert_eq!(store.evict_role(Role::Doctor).await.unwrap(), 3);
        assert!(store.load(&current).await.is_empty());
        assert!(store.load(&leftover).await.is_empty());
        assert_eq!(store.active_subject(Role::Doctor).await.unwrap(), None);
        assert_eq!(store.load(&other_role).await, feed);
    }
}
