//! Back-references from a notification to the record it came from.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medhub_core::events::EntityType;

/// Per-record read flag owned by one consuming role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFlag {
    /// `read_by_patient`.
    Patient,
    /// `read_by_doctor`.
    Doctor,
    /// `read_by_seller`.
    Seller,
    /// `read_by_clinic`.
    Clinic,
    /// `read_by_admin`.
    Admin,
}

impl ReadFlag {
    /// Column name of the flag in the record store.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Patient => "read_by_patient",
            Self::Doctor => "read_by_doctor",
            Self::Seller => "read_by_seller",
            Self::Clinic => "read_by_clinic",
            Self::Admin => "read_by_admin",
        }
    }
}

impl std::fmt::Display for ReadFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Identifies the record a notification was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    /// Table of the record.
    pub record_type: EntityType,
    /// Primary key of the record.
    pub record_id: Uuid,
}

impl RecordRef {
    /// Build a reference to a record.
    pub fn new(record_type: EntityType, record_id: impl Into<Uuid>) -> Self {
        Self {
            record_type,
            record_id: record_id.into(),
        }
    }
}
