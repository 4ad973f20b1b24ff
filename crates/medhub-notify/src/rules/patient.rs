//! Patient rule table.

use medhub_core::events::EntityType;
use medhub_entity::appointment::Appointment;
use medhub_entity::notification::NotificationKind;
use medhub_entity::payment::PaymentStatus;
use medhub_entity::user::Role;

use super::context::{DetectionContext, ReminderLead};
use super::draft::{EventDraft, format_moment};
use super::{Predicate, Rule, RuleSet, Scope, Trigger};

pub(super) static RULES: RuleSet = RuleSet {
    role: Role::Patient,
    rules: &[
        Rule {
            kind: NotificationKind::ReminderEarly,
            trigger: Trigger::Schedule,
            predicate: Predicate::Appointment(reminder_early),
        },
        Rule {
            kind: NotificationKind::ReminderFinal,
            trigger: Trigger::Schedule,
            predicate: Predicate::Appointment(reminder_final),
        },
        Rule {
            kind: NotificationKind::PaymentApproved,
            trigger: Trigger::Mutation,
            predicate: Predicate::Appointment(payment_approved),
        },
        Rule {
            kind: NotificationKind::NewMessage,
            trigger: Trigger::Mutation,
            predicate: Predicate::Appointment(new_message),
        },
        Rule {
            kind: NotificationKind::ClinicalNoteAdded,
            trigger: Trigger::Mutation,
            predicate: Predicate::Appointment(clinical_note_added),
        },
        Rule {
            kind: NotificationKind::AttendanceMarked,
            trigger: Trigger::Mutation,
            predicate: Predicate::Appointment(attendance_marked),
        },
    ],
    scopes: &[Scope::owned(EntityType::Appointment, "patient_id")],
};

fn route(appt: &Appointment) -> String {
    format!("/patient/appointments/{}", appt.id)
}

fn reminder(ctx: &DetectionContext, appt: &Appointment, which: ReminderLead) -> Option<EventDraft> {
    if !ctx.owns(appt.patient_id) || !appt.status.is_upcoming() {
        return None;
    }
    if !ctx.reminders.is_due(which, appt.scheduled_at, ctx.now) {
        return None;
    }

    let hours = ctx.reminders.lead(which).num_hours();
    let kind = match which {
        ReminderLead::Early => NotificationKind::ReminderEarly,
        ReminderLead::Final => NotificationKind::ReminderFinal,
    };
    Some(
        EventDraft::new(
            kind,
            format!("{}-{}", which.id_prefix(), appt.id),
            EntityType::Appointment,
            appt.id,
            appt.scheduled_at,
        )
        .title(format!("Appointment in less than {hours} hours"))
        .description(format!(
            "Your appointment with {} is at {}",
            appt.doctor_name,
            format_moment(appt.scheduled_at)
        ))
        .navigate(route(appt)),
    )
}

fn reminder_early(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    reminder(ctx, appt, ReminderLead::Early)
}

fn reminder_final(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    reminder(ctx, appt, ReminderLead::Final)
}

fn payment_approved(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    if !ctx.owns(appt.patient_id) || appt.payment_status != PaymentStatus::Approved {
        return None;
    }
    Some(
        EventDraft::new(
            NotificationKind::PaymentApproved,
            format!("payment-approved-{}", appt.id),
            EntityType::Appointment,
            appt.id,
            appt.last_change(),
        )
        .title("Payment approved")
        .description(format!(
            "Your payment for the appointment with {} was approved",
            appt.doctor_name
        ))
        .navigate(route(appt)),
    )
}

fn new_message(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    if !ctx.owns(appt.patient_id) || appt.read_by_patient {
        return None;
    }
    let msg = appt.last_message.as_ref()?;
    if msg.sender_role == Role::Patient {
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

fn clinical_note_added(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    if !ctx.owns(appt.patient_id) || !appt.has_clinical_output() {
        return None;
    }
    Some(
        EventDraft::new(
            NotificationKind::ClinicalNoteAdded,
            format!("clinical-note-{}", appt.id),
            EntityType::Appointment,
            appt.id,
            appt.last_change(),
        )
        .title("Consultation notes available")
        .description(format!(
            "{} added notes or a prescription to your consultation",
            appt.doctor_name
        ))
        .navigate(route(appt)),
    )
}

fn attendance_marked(ctx: &DetectionContext, appt: &Appointment) -> Option<EventDraft> {
    if !ctx.owns(appt.patient_id) {
        return None;
    }
    let outcome = appt.attendance?;
    Some(
        EventDraft::new(
            NotificationKind::AttendanceMarked,
            format!("attendance-{}-{}", appt.id, outcome.as_str()),
            EntityType::Appointment,
            appt.id,
            appt.scheduled_at,
        )
        .title("Attendance recorded")
        .description(format!(
            "Your appointment on {} was marked as {}",
            format_moment(appt.scheduled_at),
            outcome.as_str().replace('_', " ")
        ))
        .navigate(route(appt)),
    )
}
