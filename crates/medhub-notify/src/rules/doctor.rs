//! Doctor rule table. Scoped to the doctor's own appointments,
//! subscription payments and support tickets.

use medhub_core::events::EntityType;
use medhub_entity::appointment::{Appointment, AppointmentStatus, PatientResponse};
use medhub_entity::notification::NotificationKind;
use medhub_entity::payment::{Payment, PaymentPurpose, PaymentStatus};
use medhub_entity::ticket::SupportTicket;
use medhub_entity::user::Role;

use super::context::DetectionContext;
use super::draft::{EventDraft, format_moment};
use super::{Predicate, Rule, RuleSet, Scope, Trigger};

pub(super) static RULES: RuleSet = RuleSet {
    role: Role::Doctor,
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
        Rule {
            kind: NotificationKind::NewMessage,
            trigger: Trigger::Mutation,
            predicate: Predicate::Appointment(new_message),
        },
        Rule {
            kind: NotificationKind::SubscriptionUpdate,
            trigger: Trigger::Mutation,
            predicate: Predicate::Payment(subscription_update),
        },
        Rule {
            kind: NotificationKind::SupportReply,
            trigger: Trigger::Mutation,
            predicate: Predicate::Ticket(support_reply),
        },
    ],
    scopes: &[
        Scope::owned(EntityType::Appointment, "doctor_id"),
        Scope::owned(EntityType::Payment, "owner_id"),
        Scope::owned(EntityType::Ticket, "owner_id"),
    ],
};

fn route(appt: &Appointment) -> String {
    format!("/doctor/appointments/{}", appt.id)
}

fn new_appointment(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    if !ctx.owns(appt.doctor_id)
        || appt.read_by_doctor
        || appt.status == AppointmentStatus::Cancelled
    {
        return None;
    }
    Some(
        EventDraft::new(
            NotificationKind::NewAppointment,
            format!("new-appt-{}", appt.id),
            EntityType::Appointment,
            appt.id,
            appt.created_at,
        )
        .title("New appointment")
        .description(format!(
            "{} booked a consultation for {}",
            appt.patient_name,
            format_moment(appt.scheduled_at)
        ))
        .navigate(route(appt)),
    )
}

fn payment_verification_needed(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    if !ctx.owns(appt.doctor_id) || !appt.awaits_transfer_verification() {
        return None;
    }
    Some(
        EventDraft::new(
            NotificationKind::PaymentVerificationNeeded,
            format!("payment-verify-{}", appt.id),
            EntityType::Appointment,
            appt.id,
            appt.last_change(),
        )
        .title("Transfer awaiting verification")
        .description(format!(
            "{} uploaded a transfer receipt for {}",
            appt.patient_name,
            format_moment(appt.scheduled_at)
        ))
        .navigate(route(appt)),
    )
}

pub(super) fn response_draft(
    appt: &Appointment,
    response: PatientResponse,
    id: String,
    route: String,
) -> EventDraft {
    let (kind, title) = match response {
        PatientResponse::Confirmed => (NotificationKind::PatientConfirmed, "Patient confirmed"),
        PatientResponse::Cancelled => (NotificationKind::PatientCancelled, "Patient cancelled"),
    };
    EventDraft::new(kind, id, EntityType::Appointment, appt.id, appt.last_change())
        .title(title)
        .description(format!(
            "{} {} the appointment on {}",
            appt.patient_name,
            response.as_str(),
            format_moment(appt.scheduled_at)
        ))
        .navigate(route)
}

fn patient_response(
    ctx: &DetectionContext,
    appt: &Appointment,
    wanted: PatientResponse,
) -> Option<EventDraft> {
    if !ctx.owns(appt.doctor_id) || appt.patient_response != Some(wanted) {
        return None;
    }
    Some(response_draft(
        appt,
        wanted,
        format!("patient-{}-{}", wanted.as_str(), appt.id),
        route(appt),
    ))
}

fn patient_confirmed(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    patient_response(ctx, appt, PatientResponse::Confirmed)
}

fn patient_cancelled(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    patient_response(ctx, appt, PatientResponse::Cancelled)
}

fn new_message(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    if !ctx.owns(appt.doctor_id) || appt.read_by_doctor {
        return None;
    }
    let msg = appt.last_message.as_ref()?;
    if msg.sender_role != Role::Patient {
        return None;
    }
    Some(
        EventDraft::new(
            NotificationKind::NewMessage,
            format!("msg-{}-{}", appt.id, msg.id),
            EntityType::Appointment,
            appt.id,
            msg.sent_at,
        )
        .title(format!("New message from {}", msg.sender_name))
        .description(msg.preview(80))
        .navigate(format!("{}/chat", route(appt))),
    )
}

fn subscription_update(ctx: &DetectionContext, payment: &Payment) -> Option<EventDraft> {
    if !ctx.owns(payment.owner_id) || payment.purpose != PaymentPurpose::Subscription {
        return None;
    }
    let (outcome, title) = match payment.status {
        PaymentStatus::Approved => ("approved", "Subscription approved"),
        PaymentStatus::Rejected => ("rejected", "Subscription payment rejected"),
        _ => return None,
    };
    let plan = payment.description.as_deref().unwrap_or("subscription");
    Some(
        EventDraft::new(
            NotificationKind::SubscriptionUpdate,
            format!("subscription-{outcome}-{}", payment.id),
            EntityType::Payment,
            payment.id,
            payment.last_change(),
        )
        .title(title)
        .description(format!(
            "Your {plan} payment of {} was {outcome}",
            payment.display_amount()
        ))
        .navigate("/doctor/subscription"),
    )
}

/// Shared by doctors and sellers: an admin answered one of the subject's tickets.
pub(super) fn ticket_reply(
    ctx: &DetectionContext,
    ticket: &SupportTicket,
    role: Role,
) -> Option<EventDraft> {
    if !ctx.owns(ticket.owner_id) || ticket.owner_role != role {
        return None;
    }
    let (body, replied_at) = ticket.reply()?;
    let preview: String = body.chars().take(120).collect();
    Some(
        EventDraft::new(
            NotificationKind::SupportReply,
            format!("ticket-reply-{}-{}", ticket.id, replied_at.timestamp()),
            EntityType::Ticket,
            ticket.id,
            replied_at,
        )
        .title(format!("Support replied: {}", ticket.subject))
        .description(preview)
        .navigate(format!("/{role}/support/{}", ticket.id)),
    )
}

fn support_reply(ctx: &DetectionContext, ticket: &SupportTicket) -> Option<EventDraft> {
    ticket_reply(ctx, ticket, Role::Doctor)
}
