//! Record builders shared by unit tests.

use chrono::{DateTime, Duration, Utc};

use medhub_core::types::{AppointmentId, PaymentId, SubjectId, TicketId};
use medhub_entity::appointment::{Appointment, AppointmentStatus};
use medhub_entity::payment::{Payment, PaymentMethod, PaymentPurpose, PaymentStatus};
use medhub_entity::registration::{DoctorRegistration, RegistrationStatus};
use medhub_entity::ticket::{SupportTicket, TicketStatus};
use medhub_entity::user::Role;

/// A pending, unread, card-paid appointment.
pub(crate) fn appointment(
    patient: SubjectId,
    doctor: SubjectId,
    scheduled_at: DateTime<Utc>,
) -> Appointment {
    Appointment {
        id: AppointmentId::new(),
        patient_id: patient,
        doctor_id: doctor,
        clinic_id: None,
        patient_name: "Ana Lima".to_string(),
        doctor_name: "Dr. Ruiz".to_string(),
        scheduled_at,
        status: AppointmentStatus::Pending,
        patient_response: None,
        payment_method: PaymentMethod::Card,
        payment_status: PaymentStatus::Pending,
        payment_proof_url: None,
        attendance: None,
        clinical_note: None,
        prescription: None,
        last_message: None,
        read_by_patient: false,
        read_by_doctor: false,
        read_by_clinic: false,
        created_at: scheduled_at - Duration::days(7),
        updated_at: None,
    }
}

/// An unread platform payment.
pub(crate) fn payment(owner: SubjectId, purpose: PaymentPurpose, status: PaymentStatus) -> Payment {
    Payment {
        id: PaymentId::new(),
        owner_id: owner,
        purpose,
        amount_cents: 4_900,
        currency: "USD".to_string(),
        status,
        method: PaymentMethod::Transfer,
        description: None,
        read_by_doctor: false,
        read_by_seller: false,
        read_by_admin: false,
        created_at: Utc::now() - Duration::days(1),
        updated_at: None,
    }
}

/// An open, unanswered ticket.
pub(crate) fn ticket(owner: SubjectId, owner_role: Role) -> SupportTicket {
    SupportTicket {
        id: TicketId::new(),
        owner_id: owner,
        owner_role,
        subject: "Invoice shows the wrong plan".to_string(),
        status: TicketStatus::Open,
        admin_reply: None,
        replied_at: None,
        read_by_doctor: false,
        read_by_seller: false,
        read_by_admin: false,
        created_at: Utc::now() - Duration::hours(5),
    }
}

/// A registration awaiting review.
pub(crate) fn registration(referrer: Option<SubjectId>) -> DoctorRegistration {
    DoctorRegistration {
        doctor_id: SubjectId::new(),
        full_name: "Dr. Chen".to_string(),
        specialty: Some("Dermatology".to_string()),
        referrer_id: referrer,
        status: RegistrationStatus::PendingReview,
        read_by_seller: false,
        read_by_admin: false,
        registered_at: Utc::now() - Duration::days(2),
    }
}
