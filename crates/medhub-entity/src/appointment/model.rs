//! Appointment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medhub_core::types::{AppointmentId, SubjectId};

use super::message::ChatMessage;
use super::status::{AppointmentStatus, Attendance, PatientResponse};
use crate::payment::{PaymentMethod, PaymentStatus};

/// A booked consultation between a patient and a doctor, optionally at a clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique appointment identifier.
    pub id: AppointmentId,
    /// The patient who booked.
    pub patient_id: SubjectId,
    /// The doctor being consulted.
    pub doctor_id: SubjectId,
    /// The clinic hosting the appointment, if any.
    #[serde(default)]
    pub clinic_id: Option<SubjectId>,
    /// Patient display name.
    #[serde(default)]
    pub patient_name: String,
    /// Doctor display name.
    #[serde(default)]
    pub doctor_name: String,
    /// The appointment moment.
    pub scheduled_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// The patient's answer to the confirmation request.
    #[serde(default)]
    pub patient_response: Option<PatientResponse>,
    /// How the consultation fee is paid.
    pub payment_method: PaymentMethod,
    /// State of the consultation fee.
    pub payment_status: PaymentStatus,
    /// Uploaded proof of a bank transfer.
    #[serde(default)]
    pub payment_proof_url: Option<String>,
    /// Attendance outcome marked after the slot.
    #[serde(default)]
    pub attendance: Option<Attendance>,
    /// Clinical note written after completion.
    #[serde(default)]
    pub clinical_note: Option<String>,
    /// Prescription written after completion.
    #[serde(default)]
    pub prescription: Option<String>,
    /// Latest message on the appointment thread.
    #[serde(default)]
    pub last_message: Option<ChatMessage>,
    /// Whether the patient has seen the latest relevant state.
    #[serde(default)]
    pub read_by_patient: bool,
    /// Whether the doctor has seen the latest relevant state.
    #[serde(default)]
    pub read_by_doctor: bool,
    /// Whether the clinic has seen the latest relevant state.
    #[serde(default)]
    pub read_by_clinic: bool,
    /// When the appointment was booked.
    pub created_at: DateTime<Utc>,
    /// When the row last changed.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// Whether a bank transfer is waiting for someone to verify it.
    pub fn awaits_transfer_verification(&self) -> bool {
        self.payment_method == PaymentMethod::Transfer
            && self.payment_status == PaymentStatus::Pending
            && self.payment_proof_url.is_some()
            && self.status != AppointmentStatus::Cancelled
    }

    /// Whether clinical output was attached after the consultation.
    pub fn has_clinical_output(&self) -> bool {
        self.status == AppointmentStatus::Completed
            && (self.clinical_note.as_deref().is_some_and(|n| !n.trim().is_empty())
                || self.prescription.as_deref().is_some_and(|p| !p.trim().is_empty()))
    }

    /// Last time anything on the row changed.
    pub fn last_change(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Appointment {
        serde_json::from_value(serde_json::json!({
            "id": "6f1c1a64-3a0e-4a7e-8f6c-1c8f0b2f9e01",
            "patient_id": "0b8f8a9e-2f4c-4d1e-9a51-8d4f3f1e2a10",
            "doctor_id": "8a2d6c1b-7e4f-4b3a-9c0d-5e6f7a8b9c20",
            "scheduled_at": "2026-05-01T10:00:00Z",
            "status": "pending",
            "payment_method": "transfer",
            "payment_status": "pending",
            "created_at": "2026-04-20T08:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_partial_row() {
        let appt = sample();
        assert!(!appt.read_by_doctor);
        assert!(appt.clinic_id.is_none());
        assert!(appt.last_message.is_none());
    }

    #[test]
    fn test_transfer_needs_proof() {
        let mut appt = sample();
        assert!(!appt.awaits_transfer_verification());
        appt.payment_proof_url = Some("proofs/1.png".to_string());
        assert!(appt.awaits_transfer_verification());
        appt.payment_status = PaymentStatus::Approved;
        assert!(!appt.awaits_transfer_verification());
    }

    #[test]
    fn test_clinical_output_requires_completion() {
        let mut appt = sample();
        appt.prescription = Some("Amoxicillin 500mg".to_string());
        assert!(!appt.has_clinical_output());
        appt.status = AppointmentStatus::Completed;
        assert!(appt.has_clinical_output());
    }
}
