//! Notification kind enumeration.

use serde::{Deserialize, Serialize};

/// What domain occurrence a notification represents.
///
/// Each role emits a subset of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Early reminder ahead of an upcoming appointment (patient).
    ReminderEarly,
    /// Final reminder shortly before an appointment (patient).
    ReminderFinal,
    /// The consultation fee was approved (patient).
    PaymentApproved,
    /// A message arrived from the counter-party.
    NewMessage,
    /// A clinical note or prescription was attached (patient).
    ClinicalNoteAdded,
    /// The attendance outcome was recorded (patient).
    AttendanceMarked,
    /// A new appointment was booked (doctor, clinic).
    NewAppointment,
    /// A bank transfer awaits verification (doctor, clinic).
    PaymentVerificationNeeded,
    /// The patient confirmed the appointment (doctor, clinic).
    PatientConfirmed,
    /// The patient cancelled the appointment (doctor, clinic).
    PatientCancelled,
    /// A subscription payment was approved or rejected (doctor).
    SubscriptionUpdate,
    /// An admin replied to a support ticket (doctor, seller).
    SupportReply,
    /// A referred doctor registered (seller).
    ReferralRegistered,
    /// A commission was paid out (seller).
    CommissionPaid,
    /// A support ticket was opened (admin).
    NewTicket,
    /// A payment awaits approval (admin).
    PaymentPendingApproval,
    /// A doctor registration awaits review (admin).
    RegistrationPendingReview,
}

impl NotificationKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReminderEarly => "reminder_early",
            Self::ReminderFinal => "reminder_final",
            Self::PaymentApproved => "payment_approved",
            Self::NewMessage => "new_message",
            Self::ClinicalNoteAdded => "clinical_note_added",
            Self::AttendanceMarked => "attendance_marked",
            Self::NewAppointment => "new_appointment",
            Self::PaymentVerificationNeeded => "payment_verification_needed",
            Self::PatientConfirmed => "patient_confirmed",
            Self::PatientCancelled => "patient_cancelled",
            Self::SubscriptionUpdate => "subscription_update",
            Self::SupportReply => "support_reply",
            Self::ReferralRegistered => "referral_registered",
            Self::CommissionPaid => "commission_paid",
            Self::NewTicket => "new_ticket",
            Self::PaymentPendingApproval => "payment_pending_approval",
            Self::RegistrationPendingReview => "registration_pending_review",
        }
    }

    /// Time-based kinds: not caused by a record mutation.
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::ReminderEarly | Self::ReminderFinal)
    }

    /// Whether marking the notification read flips a backend read flag.
    pub fn syncs_read_flag(&self) -> bool {
        !self.is_scheduled()
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        let json = serde_json::to_string(&NotificationKind::PaymentVerificationNeeded).unwrap();
        assert_eq!(json, "\"payment_verification_needed\"");
    }

    #[test]
    fn test_reminders_do_not_sync() {
        assert!(!NotificationKind::ReminderFinal.syncs_read_flag());
        assert!(NotificationKind::NewAppointment.syncs_read_flag());
    }
}
