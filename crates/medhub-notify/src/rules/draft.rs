//! Builder for detected notifications before they are stamped.

use chrono::{DateTime, Utc};

use medhub_core::events::EntityType;
use medhub_entity::notification::{NotificationEvent, NotificationKind, RecordRef};

/// A notification produced by a predicate, not yet stamped with `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// Idempotency key.
    pub id: String,
    /// What happened.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Business time of the underlying event.
    pub event_date: DateTime<Utc>,
    /// UI route hint.
    pub navigation_target: String,
    /// The record the draft was derived from.
    pub source: RecordRef,
}

impl EventDraft {
    /// Start a draft for a record.
    pub fn new(
        kind: NotificationKind,
        id: impl Into<String>,
        record_type: EntityType,
        record_id: impl Into<uuid::Uuid>,
        event_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: String::new(),
            description: String::new(),
            event_date,
            navigation_target: String::new(),
            source: RecordRef::new(record_type, record_id),
        }
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the body text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the UI route hint.
    pub fn navigate(mut self, target: impl Into<String>) -> Self {
        self.navigation_target = target.into();
        self
    }

    /// Stamp the draft with its detection time.
    pub fn into_event(self, created_at: DateTime<Utc>) -> NotificationEvent {
        NotificationEvent {
            id: self.id,
            kind: self.kind,
            title: self.title,
            description: self.description,
            event_date: self.event_date,
            created_at,
            read: false,
            navigation_target: self.navigation_target,
            source: self.source,
        }
    }
}

/// Human-readable UTC timestamp used in descriptions.
pub(crate) fn format_moment(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
