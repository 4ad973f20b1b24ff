//! Notification rule engine.
//!
//! Each role owns a static [`RuleSet`]: a table of rules, each pairing a
//! [`NotificationKind`] with a trigger and a predicate over one record
//! type. The generic [`RuleEngine`] walks the table against a snapshot
//! (polling) or a single changed row (push).

pub mod admin;
pub mod clinic;
pub mod context;
pub mod doctor;
pub mod draft;
pub mod engine;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod patient;
pub mod seller;

use serde_json::Value;

use medhub_core::error::AppError;
use medhub_core::events::EntityType;
use medhub_core::result::AppResult;
use medhub_entity::appointment::Appointment;
use medhub_entity::notification::NotificationKind;
use medhub_entity::payment::Payment;
use medhub_entity::registration::DoctorRegistration;
use medhub_entity::ticket::SupportTicket;
use medhub_entity::user::Role;

pub use context::{DetectionContext, ReminderLead, ReminderPolicy};
pub use draft::EventDraft;
pub use engine::RuleEngine;

/// What causes a rule to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A record changed; the push path may synthesize the event.
    Mutation,
    /// Time passed; only a full detection pass can see it.
    Schedule,
}

/// A predicate over one record type.
#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// Evaluated against appointments.
    Appointment(fn(&DetectionContext, &Appointment) -> Option<EventDraft>),
    /// Evaluated against platform payments.
    Payment(fn(&DetectionContext, &Payment) -> Option<EventDraft>),
    /// Evaluated against support tickets.
    Ticket(fn(&DetectionContext, &SupportTicket) -> Option<EventDraft>),
    /// Evaluated against doctor registrations.
    Registration(fn(&DetectionContext, &DoctorRegistration) -> Option<EventDraft>),
}

impl Predicate {
    /// The record table this predicate reads.
    pub fn entity(&self) -> EntityType {
        match self {
            Self::Appointment(_) => EntityType::Appointment,
            Self::Payment(_) => EntityType::Payment,
            Self::Ticket(_) => EntityType::Ticket,
            Self::Registration(_) => EntityType::Registration,
        }
    }
}

/// One row of a role's rule table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Kind of every event the rule produces.
    pub kind: NotificationKind,
    /// What causes it to fire.
    pub trigger: Trigger,
    /// The condition and the event it yields.
    pub predicate: Predicate,
}

impl Rule {
    /// Evaluate the rule against a decoded row of any type.
    ///
    /// Returns `None` when the row is of another record type or the
    /// predicate does not hold.
    pub fn apply(&self, ctx: &DetectionContext, row: &RecordRow) -> Option<EventDraft> {
        match (&self.predicate, row) {
            (Predicate::Appointment(f), RecordRow::Appointment(r)) => f(ctx, r),
            (Predicate::Payment(f), RecordRow::Payment(r)) => f(ctx, r),
            (Predicate::Ticket(f), RecordRow::Ticket(r)) => f(ctx, r),
            (Predicate::Registration(f), RecordRow::Registration(r)) => f(ctx, r),
            _ => None,
        }
    }
}

/// A record table a role listens to, and the column tying rows to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    /// Table to watch.
    pub entity: EntityType,
    /// Owner column compared with the subject id; `None` for unscoped roles.
    pub owner_column: Option<&'static str>,
}

impl Scope {
    /// A table filtered by an owner column.
    pub const fn owned(entity: EntityType, column: &'static str) -> Self {
        Self {
            entity,
            owner_column: Some(column),
        }
    }

    /// A table visible in full.
    pub const fn unscoped(entity: EntityType) -> Self {
        Self {
            entity,
            owner_column: None,
        }
    }
}

/// Rule table and change-feed scopes of one role.
#[derive(Debug)]
pub struct RuleSet {
    /// Role the table belongs to.
    pub role: Role,
    /// Rules in evaluation order.
    pub rules: &'static [Rule],
    /// Tables the push listener subscribes to.
    pub scopes: &'static [Scope],
}

impl RuleSet {
    /// The table for a role.
    pub fn for_role(role: Role) -> &'static RuleSet {
        match role {
            Role::Patient => &patient::RULES,
            Role::Doctor => &doctor::RULES,
            Role::Seller => &seller::RULES,
            Role::Clinic => &clinic::RULES,
            Role::Admin => &admin::RULES,
        }
    }

    /// Rules a single row mutation can fire.
    pub fn mutation_rules(&self) -> impl Iterator<Item = &'static Rule> {
        self.rules.iter().filter(|r| r.trigger == Trigger::Mutation)
    }
}

/// A changed row decoded into its typed record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordRow {
    /// An appointment row.
    Appointment(Appointment),
    /// A payment row.
    Payment(Payment),
    /// A support ticket row.
    Ticket(SupportTicket),
    /// A doctor registration row.
    Registration(DoctorRegistration),
}

impl RecordRow {
    /// Decode a raw change-feed row of the given table.
    pub fn decode(entity: EntityType, row: &Value) -> AppResult<Self> {
        let decoded = match entity {
            EntityType::Appointment => Self::Appointment(serde_json::from_value(row.clone())?),
            EntityType::Payment => Self::Payment(serde_json::from_value(row.clone())?),
            EntityType::Ticket => Self::Ticket(serde_json::from_value(row.clone())?),
            EntityType::Registration => {
                Self::Registration(serde_json::from_value(row.clone())?)
            }
        };
        Ok(decoded)
    }

    /// The table the row belongs to.
    pub fn entity(&self) -> EntityType {
        match self {
            Self::Appointment(_) => EntityType::Appointment,
            Self::Payment(_) => EntityType::Payment,
            Self::Ticket(_) => EntityType::Ticket,
            Self::Registration(_) => EntityType::Registration,
        }
    }
}

/// Decode a row, labelling the failure with its table.
pub(crate) fn decode_row(entity: EntityType, row: &Value) -> AppResult<RecordRow> {
    RecordRow::decode(entity, row).map_err(|e| {
        AppError::with_source(
            e.kind,
            format!("Undecodable {entity} row in change event"),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_a_table() {
        for role in Role::ALL {
            let set = RuleSet::for_role(role);
            assert_eq!(set.role, role);
            assert!(!set.rules.is_empty());
            assert!(!set.scopes.is_empty());
        }
    }

    #[test]
    fn test_reminders_are_scheduled_only() {
        for role in Role::ALL {
            for rule in RuleSet::for_role(role).rules {
                assert_eq!(rule.kind.is_scheduled(), rule.trigger == Trigger::Schedule);
            }
        }
    }

    #[test]
    fn test_scopes_cover_rule_tables() {
        for role in Role::ALL {
            let set = RuleSet::for_role(role);
            for rule in set.rules {
                let entity = rule.predicate.entity();
                assert!(
                    set.scopes.iter().any(|s| s.entity == entity),
                    "{role} has a rule over {entity} but no scope for it"
                );
            }
        }
    }

    #[test]
    fn test_decode_rejects_foreign_row() {
        let row = serde_json::json!({ "subject": "no id here" });
        let err = decode_row(EntityType::Ticket, &row).unwrap_err();
        assert_eq!(err.kind, medhub_core::error::ErrorKind::Serialization);
    }
}
