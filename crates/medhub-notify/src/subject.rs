//! Subject identity: the (role, user) pair owning a feed.

use std::fmt;

use serde::{Deserialize, Serialize};

use medhub_cache::keys;
use medhub_core::types::SubjectId;
use medhub_entity::user::Role;

/// The (role, user) pair whose notification feed is maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectKey {
    /// The role the user is acting as.
    pub role: Role,
    /// The user.
    pub subject_id: SubjectId,
}

impl SubjectKey {
    /// Create a subject key.
    pub fn new(role: Role, subject_id: SubjectId) -> Self {
        Self { role, subject_id }
    }

    /// Durable cache key of the subject's feed.
    pub fn cache_key(&self) -> String {
        keys::feed(self.role, self.subject_id)
    }

    /// Whether the given user is this subject.
    pub fn is(&self, id: SubjectId) -> bool {
        self.subject_id == id
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.subject_id)
    }
}
