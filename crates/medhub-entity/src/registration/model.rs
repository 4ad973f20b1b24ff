//! Doctor registration entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medhub_core::types::SubjectId;

/// Review state of a doctor registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Waiting for an admin review.
    PendingReview,
    /// Approved; the doctor can receive appointments.
    Approved,
    /// Rejected by an admin.
    Rejected,
}

/// A doctor signing up on the platform, optionally referred by a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRegistration {
    /// The registering doctor.
    pub doctor_id: SubjectId,
    /// Doctor display name.
    pub full_name: String,
    /// Declared specialty.
    #[serde(default)]
    pub specialty: Option<String>,
    /// The seller who referred the doctor.
    #[serde(default)]
    pub referrer_id: Option<SubjectId>,
    /// Review state.
    pub status: RegistrationStatus,
    /// Whether the referring seller has seen the registration.
    #[serde(default)]
    pub read_by_seller: bool,
    /// Whether an admin has seen the registration.
    #[serde(default)]
    pub read_by_admin: bool,
    /// When the doctor registered.
    pub registered_at: DateTime<Utc>,
}
