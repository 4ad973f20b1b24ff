//! One session per role, with previous-subject eviction.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use medhub_entity::user::Role;

use crate::subject::SubjectKey;

use super::subject::{SessionDeps, SubjectSession};

/// Owns the live sessions of a runtime, at most one per role.
#[derive(Debug)]
pub struct SessionRegistry {
    deps: SessionDeps,
    sessions: Mutex<HashMap<Role, Arc<SubjectSession>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new(deps: SessionDeps) -> Self {
        Self {
            deps,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Bind a subject to its role.
    ///
    /// Re-activating the current subject returns the running session.
    /// Any other subject of the same role is torn down and its cached
    /// feed evicted, including one left behind by an earlier process.
    pub async fn activate(&self, key: SubjectKey) -> Arc<SubjectSession> {
        let mut sessions = self.sessions.lock().await;

        if let Some(current) = sessions.get(&key.role) {
            if *current.key() == key && current.is_active() {
                return current.clone();
            }
        }

        if let Some(previous) = sessions.remove(&key.role) {
            previous.shutdown().await;
            if *previous.key() != key {
                self.evict(previous.key()).await;
            }
        }

        match self.deps.store.active_subject(key.role).await {
            Ok(Some(marked)) if marked != key.subject_id => {
                self.evict(&SubjectKey::new(key.role, marked)).await;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(role = %key.role, error = %e, "Active-subject marker unreadable"),
        }
        if let Err(e) = self.deps.store.set_active_subject(&key).await {
            tracing::warn!(subject = %key, error = %e, "Failed to record active subject");
        }

        let session = SubjectSession::start(key, &self.deps).await;
        sessions.insert(key.role, session.clone());
        session
    }

    /// The running session of a role.
    pub async fn get(&self, role: Role) -> Option<Arc<SubjectSession>> {
        self.sessions.lock().await.get(&role).cloned()
    }

    /// Stop a role's session, keeping its cached feed.
    pub async fn deactivate(&self, role: Role) -> bool {
        let removed = self.sessions.lock().await.remove(&role);
        match removed {
            Some(session) => {
                session.shutdown().await;
                true
            }
            None => false,
        }
    }

    /// Tear down every session and evict every cached feed and marker of
    /// every role.
    pub async fn logout(&self) {
        let drained: Vec<_> = self.sessions.lock().await.drain().collect();
        for (_, session) in drained {
            session.shutdown().await;
        }
        for role in Role::ALL {
            match self.deps.store.evict_role(role).await {
                Ok(count) => tracing::debug!(%role, count, "Evicted cached feeds"),
                Err(e) => tracing::warn!(%role, error = %e, "Failed to evict cached feeds"),
            }
        }
        tracing::info!("All subject sessions logged out");
    }

    /// Tear down every session, keeping cached feeds for the next start.
    pub async fn shutdown_all(&self) {
        let drained: Vec<_> = self.sessions.lock().await.drain().collect();
        for (_, session) in drained {
            session.shutdown().await;
        }
    }

    /// Number of running sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether no session is running.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    async fn evict(&self, key: &SubjectKey) {
        match self.deps.store.evict(key).await {
            Ok(()) => tracing::debug!(subject = %key, "Evicted cached feed"),
            Err(e) => tracing::warn!(subject = %key, error = %e, "Failed to evict cached feed"),
        }
    }
}
