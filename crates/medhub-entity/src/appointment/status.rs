//! Appointment lifecycle enumerations.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked, awaiting confirmation or payment.
    Pending,
    /// Confirmed by the doctor or clinic.
    Confirmed,
    /// The consultation took place.
    Completed,
    /// Cancelled by either party.
    Cancelled,
}

impl AppointmentStatus {
    /// Whether the appointment still lies ahead of the patient.
    pub fn is_upcoming(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

/// The patient's answer to a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientResponse {
    /// The patient confirmed attendance.
    Confirmed,
    /// The patient cancelled.
    Cancelled,
}

impl PatientResponse {
    /// Return the response as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Attendance outcome recorded by the doctor after the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    /// The patient attended.
    Attended,
    /// The patient did not show up.
    NoShow,
}

impl Attendance {
    /// Return the outcome as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attended => "attended",
            Self::NoShow => "no_show",
        }
    }
}
