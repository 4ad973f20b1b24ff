//! Inputs shared by every predicate in a detection pass.

use chrono::{DateTime, Duration, Utc};

use medhub_core::config::NotificationsConfig;
use medhub_core::types::SubjectId;

use crate::subject::SubjectKey;

/// Which of the two appointment reminders is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderLead {
    /// The early reminder (a day ahead by default).
    Early,
    /// The final reminder (a few hours ahead by default).
    Final,
}

impl ReminderLead {
    /// Id prefix of the reminder. Fixed per reminder, whatever lead is configured.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Early => "reminder-24h",
            Self::Final => "reminder-3h",
        }
    }
}

/// Lookahead windows of the appointment reminders.
///
/// Both reminders use the same half-open window: a reminder fires while
/// `-grace <= scheduled_at - now < lead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    /// Lead time of the early reminder.
    pub early: Duration,
    /// Lead time of the final reminder.
    pub final_lead: Duration,
    /// How long past the appointment moment a reminder may still fire.
    pub grace: Duration,
}

impl ReminderPolicy {
    /// Build the policy from configuration.
    pub fn from_config(config: &NotificationsConfig) -> Self {
        Self {
            early: Duration::hours(i64::from(config.reminder_long_lead_hours)),
            final_lead: Duration::hours(i64::from(config.reminder_short_lead_hours)),
            grace: Duration::minutes(i64::from(config.reminder_grace_minutes)),
        }
    }

    /// Lead time of the given reminder.
    pub fn lead(&self, which: ReminderLead) -> Duration {
        match which {
            ReminderLead::Early => self.early,
            ReminderLead::Final => self.final_lead,
        }
    }

    /// Whether the reminder is due at `now` for an appointment at `scheduled_at`.
    pub fn is_due(&self, which: ReminderLead, scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let until = scheduled_at - now;
        until >= -self.grace && until < self.lead(which)
    }
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self::from_config(&NotificationsConfig::default())
    }
}

/// Context handed to every predicate: who is asking, and when.
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext {
    /// The subject the feed belongs to.
    pub subject: SubjectKey,
    /// Detection time; becomes `created_at` of every detected event.
    pub now: DateTime<Utc>,
    /// Reminder windows.
    pub reminders: ReminderPolicy,
}

impl DetectionContext {
    /// Create a context for a detection pass.
    pub fn new(subject: SubjectKey, now: DateTime<Utc>, reminders: ReminderPolicy) -> Self {
        Self {
            subject,
            now,
            reminders,
        }
    }

    /// Whether the record owner is the subject.
    pub fn owns(&self, owner: SubjectId) -> bool {
        self.subject.is(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hours_from_now: i64, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::hours(hours_from_now)
    }

    #[test]
    fn test_window_is_half_open() {
        let policy = ReminderPolicy::default();
        let now = Utc::now();

        // Exactly at the lead time: not yet due.
        assert!(!policy.is_due(ReminderLead::Final, at(3, now), now));
        assert!(policy.is_due(ReminderLead::Final, at(3, now) - Duration::seconds(1), now));
        // Exactly at the appointment moment: still due.
        assert!(policy.is_due(ReminderLead::Final, now, now));
    }

    #[test]
    fn test_elapsed_appointment_is_not_due_without_grace() {
        let policy = ReminderPolicy::default();
        let now = Utc::now();
        assert!(!policy.is_due(ReminderLead::Early, now - Duration::minutes(1), now));
    }

    #[test]
    fn test_grace_extends_past_the_moment() {
        let policy = ReminderPolicy {
            grace: Duration::minutes(10),
            ..ReminderPolicy::default()
        };
        let now = Utc::now();
        assert!(policy.is_due(ReminderLead::Early, now - Duration::minutes(5), now));
        assert!(!policy.is_due(ReminderLead::Early, now - Duration::minutes(11), now));
    }
}
