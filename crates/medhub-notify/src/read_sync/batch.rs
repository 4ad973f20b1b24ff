//! Read-state transitions and the backend flag batches they produce.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medhub_core::events::EntityType;
use medhub_entity::notification::{NotificationEvent, ReadFlag, RecordRef};

/// Records of one table whose read flag must be flipped to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFlagBatch {
    /// Table the records live in.
    pub record_type: EntityType,
    /// Column to flip.
    pub flag: ReadFlag,
    /// Primary keys, without duplicates, in first-seen order.
    pub record_ids: Vec<Uuid>,
}

/// All flag flips produced by one read transition, grouped by
/// (record type, flag).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadStateBatch {
    groups: Vec<ReadFlagBatch>,
}

impl ReadStateBatch {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, ignoring repeats.
    pub fn push(&mut self, record: RecordRef, flag: ReadFlag) {
        let existing = self
            .groups
            .iter()
            .position(|g| g.record_type == record.record_type && g.flag == flag);
        let idx = match existing {
            Some(idx) => idx,
            None => {
                self.groups.push(ReadFlagBatch {
                    record_type: record.record_type,
                    flag,
                    record_ids: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        let group = &mut self.groups[idx];
        if !group.record_ids.contains(&record.record_id) {
            group.record_ids.push(record.record_id);
        }
    }

    /// Whether there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of record ids across groups.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.record_ids.len()).sum()
    }

    /// The per-(table, flag) groups.
    pub fn groups(&self) -> &[ReadFlagBatch] {
        &self.groups
    }

    /// Consume into the per-(table, flag) groups.
    pub fn into_groups(self) -> Vec<ReadFlagBatch> {
        self.groups
    }
}

fn flip(event: &mut NotificationEvent, flag: ReadFlag, batch: &mut ReadStateBatch) {
    if event.read {
        return;
    }
    event.read = true;
    if event.kind.syncs_read_flag() {
        batch.push(event.source, flag);
    }
}

/// Mark every entry read.
///
/// Only entries that were unread contribute to the batch, and scheduled
/// kinds (reminders) never do.
pub fn mark_all_read(feed: &mut [NotificationEvent], flag: ReadFlag) -> ReadStateBatch {
    let mut batch = ReadStateBatch::new();
    for event in feed.iter_mut() {
        flip(event, flag, &mut batch);
    }
    batch
}

/// Mark a single entry read. Unknown or already read ids yield an empty batch.
pub fn mark_read(feed: &mut [NotificationEvent], id: &str, flag: ReadFlag) -> ReadStateBatch {
    let mut batch = ReadStateBatch::new();
    if let Some(event) = feed.iter_mut().find(|e| e.id == id) {
        flip(event, flag, &mut batch);
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::merge::tests::event;
    use chrono::Utc;
    use medhub_entity::notification::NotificationKind;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn payment_event(id: &str, record: Uuid, read: bool) -> NotificationEvent {
        let mut e = event(id, Utc::now());
        e.kind = NotificationKind::CommissionPaid;
        e.source = RecordRef::new(EntityType::Payment, record);
        e.read = read;
        e
    }

    #[test]
    fn test_only_previously_unread_are_batched() {
        let unread = Uuid::new_v4();
        let mut feed = vec![
            payment_event("commission-paid-1", unread, false),
            payment_event("commission-paid-2", Uuid::new_v4(), true),
        ];

        let batch = mark_all_read(&mut feed, ReadFlag::Seller);

        assert!(feed.iter().all(|e| e.read));
        assert_eq!(
            batch.groups(),
            &[ReadFlagBatch {
                record_type: EntityType::Payment,
                flag: ReadFlag::Seller,
                record_ids: vec![unread],
            }]
        );
    }

    #[test]
    fn test_groups_by_record_type_and_dedupes() {
        let appt = Uuid::new_v4();
        let mut a = event("new-appt-x", Utc::now());
        a.source = RecordRef::new(EntityType::Appointment, appt);
        let mut b = event("payment-verify-x", Utc::now());
        b.kind = NotificationKind::PaymentVerificationNeeded;
        b.source = RecordRef::new(EntityType::Appointment, appt);
        let mut c = event("support", Utc::now());
        c.kind = NotificationKind::SupportReply;
        c.source = RecordRef::new(EntityType::Ticket, Uuid::new_v4());
        let mut feed = vec![a, b, c];

        let batch = mark_all_read(&mut feed, ReadFlag::Doctor);
        assert_eq!(batch.groups().len(), 2);
        assert_eq!(batch.groups()[0].record_type, EntityType::Appointment);
        assert_eq!(batch.groups()[0].record_ids, vec![appt]);
        assert_eq!(batch.record_count(), 2);
    }

    #[test]
    fn test_reminders_never_batched() {
        let mut reminder = event("reminder-3h-x", Utc::now());
        reminder.kind = NotificationKind::ReminderFinal;
        let mut feed = vec![reminder];

        let batch = mark_all_read(&mut feed, ReadFlag::Patient);
        assert!(feed[0].read);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_read_is_monotonic() {
        let mut feed = vec![payment_event("p", Uuid::new_v4(), false)];
        assert!(!mark_all_read(&mut feed, ReadFlag::Seller).is_empty());
        assert!(mark_all_read(&mut feed, ReadFlag::Seller).is_empty());
        assert!(feed[0].read);
    }

    #[test]
    fn test_mark_single() {
        let target = Uuid::new_v4();
        let mut feed = vec![
            payment_event("a", target, false),
            payment_event("b", Uuid::new_v4(), false),
        ];
        let batch = mark_read(&mut feed, "a", ReadFlag::Seller);
        assert_eq!(batch.record_count(), 1);
        assert!(feed[0].read);
        assert!(!feed[1].read);
        assert!(mark_read(&mut feed, "missing", ReadFlag::Seller).is_empty());
    }

    /// `(record index, reminder, read)` triples over a small record pool,
    /// so several entries may share a record.
    fn feed_of(spec: &[(usize, bool, bool)], records: &[Uuid]) -> Vec<NotificationEvent> {
        spec.iter()
            .enumerate()
            .map(|(i, &(record, reminder, read))| {
                let mut e = payment_event(&format!("e{i}"), records[record], read);
                if reminder {
                    e.kind = NotificationKind::ReminderEarly;
                }
                e
            })
            .collect()
    }

    fn entries() -> impl Strategy<Value = Vec<(usize, bool, bool)>> {
        prop::collection::vec((0usize..6, any::<bool>(), any::<bool>()), 0..20)
    }

    proptest! {
        #[test]
        fn prop_mark_all_read_batches_exactly_the_unread(spec in entries()) {
            let records: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();
            let mut feed = feed_of(&spec, &records);
            let want: HashSet<Uuid> = feed
                .iter()
                .filter(|e| !e.read && e.kind.syncs_read_flag())
                .map(|e| e.source.record_id)
                .collect();

            let batch = mark_all_read(&mut feed, ReadFlag::Seller);

            prop_assert!(feed.iter().all(|e| e.read));
            prop_assert_eq!(batch.record_count(), want.len());
            let got: HashSet<Uuid> = batch
                .groups()
                .iter()
                .flat_map(|g| g.record_ids.iter().copied())
                .collect();
            prop_assert_eq!(got, want);
            prop_assert!(mark_all_read(&mut feed, ReadFlag::Seller).is_empty());
        }

        #[test]
        fn prop_mark_read_touches_only_its_entry(spec in entries(), pick in 0usize..24) {
            let records: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();
            let mut feed = feed_of(&spec, &records);
            let before = feed.clone();
            let id = format!("e{pick}");

            let batch = mark_read(&mut feed, &id, ReadFlag::Seller);

            for (old, new) in before.iter().zip(&feed) {
                if old.id == id {
                    prop_assert!(new.read);
                    let synced = !old.read && old.kind.syncs_read_flag();
                    prop_assert_eq!(batch.record_count(), usize::from(synced));
                } else {
                    prop_assert_eq!(new.read, old.read);
                }
            }
            if pick >= before.len() {
                prop_assert!(batch.is_empty());
            }
        }
    }
}
