//! Seller rule table.

use medhub_core::events::EntityType;
use medhub_entity::notification::NotificationKind;
use medhub_entity::payment::{Payment, PaymentPurpose, PaymentStatus};
use medhub_entity::registration::DoctorRegistration;
use medhub_entity::ticket::SupportTicket;
use medhub_entity::user::Role;

use super::context::DetectionContext;
use super::doctor::ticket_reply;
use super::draft::EventDraft;
use super::{Predicate, Rule, RuleSet, Scope, Trigger};

pub(super) static RULES: RuleSet = RuleSet {
    role: Role::Seller,
    rules: &[
        Rule {
            kind: NotificationKind::ReferralRegistered,
            trigger: Trigger::Mutation,
            predicate: Predicate::Registration(referral_registered),
        },
        Rule {
            kind: NotificationKind::CommissionPaid,
            trigger: Trigger::Mutation,
            predicate: Predicate::Payment(commission_paid),
        },
        Rule {
            kind: NotificationKind::SupportReply,
            trigger: Trigger::Mutation,
            predicate: Predicate::Ticket(support_reply),
        },
    ],
    scopes: &[
        Scope::owned(EntityType::Registration, "referrer_id"),
        Scope::owned(EntityType::Payment, "owner_id"),
        Scope::owned(EntityType::Ticket, "owner_id"),
    ],
};

fn referral_registered(ctx: &DetectionContext, reg: &DoctorRegistration) -> Option<EventDraft> {
    if !reg.referrer_id.is_some_and(|id| ctx.owns(id)) || reg.read_by_seller {
        return None;
    }
    let specialty = reg
        .specialty
        .as_deref()
        .map(|s| format!(" ({s})"))
        .unwrap_or_default();
    Some(
        EventDraft::new(
            NotificationKind::ReferralRegistered,
            format!("referral-{}", reg.doctor_id),
            EntityType::Registration,
            reg.doctor_id,
            reg.registered_at,
        )
        .title("New referral registered")
        .description(format!("{}{specialty} signed up with your referral", reg.full_name))
        .navigate("/seller/referrals"),
    )
}

fn commission_paid(ctx: &DetectionContext, payment: &Payment) -> Option<EventDraft> {
    if !ctx.owns(payment.owner_id)
        || payment.purpose != PaymentPurpose::Commission
        || payment.status != PaymentStatus::Paid
    {
        return None;
    }
    Some(
        EventDraft::new(
            NotificationKind::CommissionPaid,
            format!("commission-paid-{}", payment.id),
            EntityType::Payment,
            payment.id,
            payment.last_change(),
        )
        .title("Commission paid")
        .description(format!("A commission of {} was paid out", payment.display_amount()))
        .navigate("/seller/commissions"),
    )
}

fn support_reply(ctx: &DetectionContext, ticket: &SupportTicket) -> Option<EventDraft> {
    ticket_reply(ctx, ticket, Role::Seller)
}
