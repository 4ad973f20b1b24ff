//! Record change events delivered by the push channel.
//!
//! The record store emits one [`ChangeEvent`] per insert or update on a
//! watched table. Payloads are the raw JSON rows; consumers decode them
//! into typed records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record table a change event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Appointment rows.
    Appointment,
    /// Payment rows (appointment, subscription and commission payments).
    Payment,
    /// Support ticket rows.
    Ticket,
    /// Doctor registration rows.
    Registration,
}

impl EntityType {
    /// Return the table name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Payment => "payment",
            Self::Ticket => "ticket",
            Self::Registration => "registration",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of mutation carried by a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
}

/// A single row mutation as delivered by the push channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Delivery identifier (differs between redeliveries of the same change).
    pub id: Uuid,
    /// The table that changed.
    pub entity: EntityType,
    /// Insert or update.
    pub event_type: ChangeType,
    /// The row before the change (`None` for inserts).
    pub old: Option<serde_json::Value>,
    /// The row after the change.
    pub new: serde_json::Value,
    /// When the store emitted the change.
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    /// Build an insert event for a new row.
    pub fn insert(entity: EntityType, new: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity,
            event_type: ChangeType::Insert,
            old: None,
            new,
            timestamp: Utc::now(),
        }
    }

    /// Build an update event carrying both row images.
    pub fn update(entity: EntityType, old: serde_json::Value, new: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity,
            event_type: ChangeType::Update,
            old: Some(old),
            new,
            timestamp: Utc::now(),
        }
    }

    /// Read a top-level string column from the new row.
    pub fn new_column(&self, column: &str) -> Option<&str> {
        self.new.get(column).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_type_wire_format() {
        let json = serde_json::to_string(&ChangeType::Insert).unwrap();
        assert_eq!(json, "\"insert\"");
    }

    #[test]
    fn test_new_column() {
        let event = ChangeEvent::insert(
            EntityType::Appointment,
            serde_json::json!({ "doctor_id": "abc" }),
        );
        assert_eq!(event.new_column("doctor_id"), Some("abc"));
        assert_eq!(event.new_column("missing"), None);
        assert!(event.old.is_none());
    }
}
