//! Clinic (secretary) rule table, scoped to appointments hosted by the clinic.

use medhub_core::events::EntityType;
use medhub_entity::appointment::{Appointment, AppointmentStatus, PatientResponse};
use medhub_entity::notification::NotificationKind;
use medhub_entity::user::Role;

use super::context::DetectionContext;
use super::doctor::response_draft;
use super::draft::{EventDraft, format_moment};
use super::{Predicate, Rule, RuleSet, Scope, Trigger};

pub(super) static RULES: RuleSet = RuleSet {
    role: Role::Clinic,
    rules: &[
        Rule {
            kind: NotificationKind::NewAppointment,
            trigger: Trigger::Mutation,
            predicate: Predicate::Appointment(new_appointment),
        },
        Rule {
            kind: NotificationKind::PaymentVerificationNeeded,
            trigger: Trigger::Mutation,
            predicate: Predicate::Appointment(payment_verification_needed),
        },
        Rule {
            kind: NotificationKind::PatientConfirmed,
            trigger: Trigger::Mutation,
            predicate: Predicate::Appointment(patient_confirmed),
        },
        Rule {
            kind: NotificationKind::PatientCancelled,
            trigger: Trigger::Mutation,
            predicate: Predicate::Appointment(patient_cancelled),
        },
    ],
    scopes: &[Scope::owned(EntityType::Appointment, "clinic_id")],
};

fn hosted(ctx: &DetectionContext, appt: &Appointment) -> bool {
    appt.clinic_id.is_some_and(|id| ctx.owns(id))
}

fn route(appt: &Appointment) -> String {
    format!("/clinic/appointments/{}", appt.id)
}

fn new_appointment(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    if !hosted(ctx, appt) || appt.read_by_clinic || appt.status == AppointmentStatus::Cancelled {
        return None;
    }
    Some(
        EventDraft::new(
            NotificationKind::NewAppointment,
            format!("clinic-new-appt-{}", appt.id),
            EntityType::Appointment,
            appt.id,
            appt.created_at,
        )
        .title("New appointment")
        .description(format!(
            "{} booked {} for {}",
            appt.patient_name,
            appt.doctor_name,
            format_moment(appt.scheduled_at)
        ))
        .navigate(route(appt)),
    )
}

fn payment_verification_needed(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    if !hosted(ctx, appt) || !appt.awaits_transfer_verification() {
        return None;
    }
    Some(
        EventDraft::new(
            NotificationKind::PaymentVerificationNeeded,
            format!("clinic-payment-verify-{}", appt.id),
            EntityType::Appointment,
            appt.id,
            appt.last_change(),
        )
        .title("Transfer awaiting verification")
        .description(format!(
            "{} uploaded a transfer receipt for {}",
            appt.patient_name, appt.doctor_name
        ))
        .navigate(route(appt)),
    )
}

fn patient_response(
    ctx: &DetectionContext,
    appt: &Appointment,
    wanted: PatientResponse,
) -> Option<EventDraft> {
    if !hosted(ctx, appt) || appt.patient_response != Some(wanted) {
        return None;
    }
    Some(response_draft(
        appt,
        wanted,
        format!("clinic-patient-{}-{}", wanted.as_str(), appt.id),
        route(appt),
    ))
}

fn patient_confirmed(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    patient_response(ctx, appt, PatientResponse::Confirmed)
}

fn patient_cancelled(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    patient_response(ctx, appt, PatientResponse::Cancelled)
}
