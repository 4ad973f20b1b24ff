//! Pure feed merging.

use std::collections::{HashMap, HashSet};

use medhub_entity::notification::NotificationEvent;

/// Union `incoming` into `current` by id.
///
/// Entries already in the feed win (their `read` state is kept); new
/// entries are placed ahead of the existing ones before the stable sort,
/// so ties on `created_at` keep new-first insertion order. Returns the
/// number of entries actually added.
///
/// Because of that tie rule, `merge(merge(f, a), b)` and
/// `merge(merge(f, b), a)` hold the same entries but only share their
/// order when no entry of `a` has the same `created_at` as one of `b`.
/// Detection stamps every entry of a pass with the pass time, so batches
/// from different passes never tie.
pub fn merge(current: &mut Vec<NotificationEvent>, incoming: Vec<NotificationEvent>) -> usize {
    let mut known: HashSet<String> = current.iter().map(|e| e.id.clone()).collect();
    let fresh: Vec<NotificationEvent> = incoming
        .into_iter()
        .filter(|e| known.insert(e.id.clone()))
        .collect();

    let added = fresh.len();
    if added == 0 {
        return 0;
    }

    let previous = std::mem::take(current);
    current.reserve(added + previous.len());
    current.extend(fresh);
    current.extend(previous);
    sort_feed(current);
    added
}

/// Stable sort by `created_at`, newest first.
pub fn sort_feed(feed: &mut [NotificationEvent]) {
    feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Drop repeated ids, keeping the first occurrence, then sort.
///
/// A repeat that was read marks the kept entry read, so reading never
/// regresses. Returns the number of entries dropped.
pub fn dedupe(feed: &mut Vec<NotificationEvent>) -> usize {
    let before = feed.len();
    let mut kept: Vec<NotificationEvent> = Vec::with_capacity(before);
    let mut index: HashMap<String, usize> = HashMap::with_capacity(before);
    for event in feed.drain(..) {
        match index.get(&event.id) {
            Some(&at) => kept[at].read |= event.read,
            None => {
                index.insert(event.id.clone(), kept.len());
                kept.push(event);
            }
        }
    }
    *feed = kept;
    sort_feed(feed);
    before - feed.len()
}

/// Ids present in a feed.
pub fn ids(feed: &[NotificationEvent]) -> HashSet<String> {
    feed.iter().map(|e| e.id.clone()).collect()
}

/// Number of unread entries.
pub fn unread_count(feed: &[NotificationEvent]) -> usize {
    feed.iter().filter(|e| e.is_unread()).count()
}
