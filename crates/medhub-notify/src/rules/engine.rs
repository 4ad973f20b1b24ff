//! Generic detection over a role's rule table.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use medhub_core::events::ChangeEvent;
use medhub_core::result::AppResult;
use medhub_entity::DomainRecords;
use medhub_entity::notification::NotificationEvent;

use super::context::{DetectionContext, ReminderPolicy};
use super::draft::EventDraft;
use super::{Predicate, Rule, RuleSet, decode_row};
use crate::subject::SubjectKey;

/// Runs one subject's rule table against records.
///
/// Detection is pure: for a fixed clock and input it always yields the
/// same events, and it never touches the feed or the cache.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    subject: SubjectKey,
    rules: &'static RuleSet,
    reminders: ReminderPolicy,
}

impl RuleEngine {
    /// Create an engine for a subject, using the table of its role.
    pub fn new(subject: SubjectKey, reminders: ReminderPolicy) -> Self {
        Self {
            subject,
            rules: RuleSet::for_role(subject.role),
            reminders,
        }
    }

    /// The subject the engine detects for.
    pub fn subject(&self) -> &SubjectKey {
        &self.subject
    }

    /// The role's rule table.
    pub fn rule_set(&self) -> &'static RuleSet {
        self.rules
    }

    fn context(&self, now: DateTime<Utc>) -> DetectionContext {
        DetectionContext::new(self.subject, now, self.reminders)
    }

    /// Full detection pass over a snapshot.
    ///
    /// Returns only events whose id is absent from `existing`; each id is
    /// emitted at most once per pass. Every event is stamped with `now`.
    pub fn detect(
        &self,
        now: DateTime<Utc>,
        existing: &HashSet<String>,
        snapshot: &DomainRecords,
    ) -> Vec<NotificationEvent> {
        let ctx = self.context(now);
        let mut seen: HashSet<String> = HashSet::new();
        let mut detected = Vec::new();

        for rule in self.rules.rules {
            for draft in evaluate(rule, &ctx, snapshot) {
                if existing.contains(&draft.id) || !seen.insert(draft.id.clone()) {
                    continue;
                }
                detected.push(draft.into_event(now));
            }
        }

        if !detected.is_empty() {
            debug!(
                subject = %self.subject,
                count = detected.len(),
                "Detected notifications"
            );
        }
        detected
    }

    /// Events caused by one row mutation.
    ///
    /// Only mutation rules are evaluated. When the previous row image is
    /// available, ids it already produced are dropped so that only
    /// transitions notify. Errors when the new row cannot be decoded.
    pub fn synthesize(
        &self,
        now: DateTime<Utc>,
        change: &ChangeEvent,
    ) -> AppResult<Vec<NotificationEvent>> {
        let ctx = self.context(now);
        let new_row = decode_row(change.entity, &change.new)?;
        let old_row = change.old.as_ref().and_then(|old| {
            decode_row(change.entity, old)
                .map_err(|e| debug!(error = %e, "Ignoring undecodable previous row"))
                .ok()
        });

        let mut seen: HashSet<String> = HashSet::new();
        let mut events = Vec::new();
        for rule in self.rules.mutation_rules() {
            let Some(draft) = rule.apply(&ctx, &new_row) else {
                continue;
            };
            let already = old_row
                .as_ref()
                .and_then(|old| rule.apply(&ctx, old))
                .is_some_and(|prev| prev.id == draft.id);
            if already || !seen.insert(draft.id.clone()) {
                continue;
            }
            events.push(draft.into_event(now));
        }
        Ok(events)
    }
}

fn evaluate(rule: &Rule, ctx: &DetectionContext, snapshot: &DomainRecords) -> Vec<EventDraft> {
    match rule.predicate {
        Predicate::Appointment(f) => snapshot.appointments.iter().filter_map(|r| f(ctx, r)).collect(),
        Predicate::Payment(f) => snapshot.payments.iter().filter_map(|r| f(ctx, r)).collect(),
        Predicate::Ticket(f) => snapshot.tickets.iter().filter_map(|r| f(ctx, r)).collect(),
        Predicate::Registration(f) => {
            snapshot.registrations.iter().filter_map(|r| f(ctx, r)).collect()
        }
    }
}
