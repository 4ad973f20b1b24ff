//! Notification feed entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kind::NotificationKind;
use super::source::RecordRef;

/// One entry of a subject's notification feed.
///
/// `id`, `kind` and `event_date` never change after creation; `read` is the
/// only mutable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Deterministic idempotency key derived from kind, record and discriminant.
    pub id: String,
    /// What happened.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Business time the event pertains to (display only).
    pub event_date: DateTime<Utc>,
    /// Detection time; the feed is ordered by this, newest first.
    pub created_at: DateTime<Utc>,
    /// Whether the subject has seen the entry.
    #[serde(default)]
    pub read: bool,
    /// Opaque route hint for the UI.
    #[serde(default)]
    pub navigation_target: String,
    /// The record the entry was derived from.
    pub source: RecordRef,
}

impl NotificationEvent {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}
