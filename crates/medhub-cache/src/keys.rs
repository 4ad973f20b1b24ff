//! Cache key builders for notification feed entries.
//!
//! Every key is namespaced by role so the same physical user id reused
//! across roles never collides.

use medhub_core::types::SubjectId;
use medhub_entity::user::Role;

/// Namespace applied to all notification cache keys.
const NAMESPACE: &str = "notifications";

/// Cache key holding the serialized feed of one subject.
pub fn feed(role: Role, subject_id: SubjectId) -> String {
    format!("{NAMESPACE}:{role}:{subject_id}")
}

/// Cache key recording which subject was last active for a role.
pub fn active_subject(role: Role) -> String {
    format!("{NAMESPACE}:{role}:active")
}

/// Pattern matching every feed key of a role.
pub fn role_pattern(role: Role) -> String {
    format!("{NAMESPACE}:{role}:*")
}
