//! Admin rule table. Admins see every ticket, payment and registration.

use medhub_core::events::EntityType;
use medhub_entity::notification::NotificationKind;
use medhub_entity::payment::{Payment, PaymentPurpose, PaymentStatus};
use medhub_entity::registration::{DoctorRegistration, RegistrationStatus};
use medhub_entity::ticket::{SupportTicket, TicketStatus};
use medhub_entity::user::Role;

use super::context::DetectionContext;
use super::draft::EventDraft;
use super::{Predicate, Rule, RuleSet, Scope, Trigger};

pub(super) static RULES: RuleSet = RuleSet {
    role: Role::Admin,
    rules: &[
        Rule {
            kind: NotificationKind::NewTicket,
            trigger: Trigger::Mutation,
            predicate: Predicate::Ticket(new_ticket),
        },
        Rule {
            kind: NotificationKind::PaymentPendingApproval,
            trigger: Trigger::Mutation,
            predicate: Predicate::Payment(payment_pending_approval),
        },
        Rule {
            kind: NotificationKind::RegistrationPendingReview,
            trigger: Trigger::Mutation,
            predicate: Predicate::Registration(registration_pending_review),
        },
    ],
    scopes: &[
        Scope::unscoped(EntityType::Ticket),
        Scope::unscoped(EntityType::Payment),
        Scope::unscoped(EntityType::Registration),
    ],
};

fn new_ticket(_ctx: &DetectionContext, ticket: &SupportTicket) -> Option<EventDraft> {
    if ticket.status != TicketStatus::Open || ticket.read_by_admin {
        return None;
    }
    Some(
        EventDraft::new(
            NotificationKind::NewTicket,
            format!("admin-ticket-{}", ticket.id),
            EntityType::Ticket,
            ticket.id,
            ticket.created_at,
        )
        .title("New support ticket")
        .description(format!("A {} opened: {}", ticket.owner_role, ticket.subject))
        .navigate(format!("/admin/tickets/{}", ticket.id)),
    )
}

fn payment_pending_approval(_ctx: &DetectionContext, payment: &Payment) -> Option<EventDraft> {
    if payment.status != PaymentStatus::Pending || payment.read_by_admin {
        return None;
    }
    let what = match payment.purpose {
        PaymentPurpose::Subscription => "Subscription payment",
        PaymentPurpose::Commission => "Commission payout",
    };
    Some(
        EventDraft::new(
            NotificationKind::PaymentPendingApproval,
            format!("admin-payment-{}", payment.id),
            EntityType::Payment,
            payment.id,
            payment.created_at,
        )
        .title("Payment awaiting approval")
        .description(format!("{what} of {} is pending", payment.display_amount()))
        .navigate(format!("/admin/payments/{}", payment.id)),
    )
}

fn registration_pending_review(
    _ctx: &DetectionContext,
    reg: &DoctorRegistration,
) -> Option<EventDraft> {
    if reg.status != RegistrationStatus::PendingReview || reg.read_by_admin {
        return None;
    }
    Some(
        EventDraft::new(
            NotificationKind::RegistrationPendingReview,
            format!("admin-registration-{}", reg.doctor_id),
            EntityType::Registration,
            reg.doctor_id,
            reg.registered_at,
        )
        .title("Registration awaiting review")
        .description(format!("{} registered as a doctor", reg.full_name))
        .navigate(format!("/admin/registrations/{}", reg.doctor_id)),
    )
}
