//! In-process change feed for single-node embedding and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;

use medhub_core::events::ChangeEvent;
use medhub_core::result::AppResult;
use medhub_core::types::SubscriptionId;

use super::channel::{ChangeFeed, ChangeFilter, ChangeSubscription};

#[derive(Debug)]
struct Subscriber {
    filter: ChangeFilter,
    tx: mpsc::Sender<ChangeEvent>,
}

/// Fan-out of published changes to filtered subscribers.
#[derive(Debug)]
pub struct MemoryChangeFeed {
    /// Subscription id → filter and sender.
    subscribers: DashMap<SubscriptionId, Subscriber>,
    /// Buffer size of each subscription.
    buffer_size: usize,
}

impl MemoryChangeFeed {
    /// Create a feed whose subscriptions buffer `buffer_size` changes.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Deliver a change to every matching subscriber.
    ///
    /// Returns the number of subscriptions it reached. Subscribers whose
    /// receiver is gone are dropped.
    pub async fn publish(&self, event: ChangeEvent) -> usize {
        let targets: Vec<(SubscriptionId, mpsc::Sender<ChangeEvent>)> = self
            .subscribers
            .iter()
            .filter(|entry| entry.filter.matches(&event))
            .map(|entry| (*entry.key(), entry.tx.clone()))
            .collect();

        let mut delivered = 0;
        for (id, tx) in targets {
            if tx.send(event.clone()).await.is_ok() {
                delivered += 1;
            } else {
                self.subscribers.remove(&id);
            }
        }
        delivered
    }

    /// Drop every subscription, as a lost connection would.
    pub fn disconnect_all(&self) -> usize {
        let count = self.subscribers.len();
        self.subscribers.clear();
        tracing::debug!("Disconnected {} change subscriptions", count);
        count
    }

    /// Number of open subscriptions. Subscriptions whose receiver is gone are pruned.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.retain(|_, sub| !sub.tx.is_closed());
        self.subscribers.len()
    }
}

impl Default for MemoryChangeFeed {
    fn default() -> Self {
        Self::new(medhub_core::config::NotificationsConfig::default().push_buffer_size)
    }
}

#[async_trait]
impl ChangeFeed for MemoryChangeFeed {
    async fn subscribe(&self, filter: ChangeFilter) -> AppResult<ChangeSubscription> {
        let (tx, receiver) = mpsc::channel(self.buffer_size);
        let id = SubscriptionId::new();
        self.subscribers.insert(id, Subscriber { filter, tx });
        Ok(ChangeSubscription { id, receiver })
    }

    async fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medhub_core::events::EntityType;

    #[tokio::test]
    async fn test_publish_respects_filters() {
        let feed = MemoryChangeFeed::new(8);
        let mut tickets = feed.subscribe(ChangeFilter::all(EntityType::Ticket)).await.unwrap();
        let mut mine = feed
            .subscribe(ChangeFilter::eq(EntityType::Payment, "owner_id", "s1"))
            .await
            .unwrap();

        let reached = feed
            .publish(ChangeEvent::insert(
                EntityType::Payment,
                serde_json::json!({ "owner_id": "s1" }),
            ))
            .await;
        assert_eq!(reached, 1);
        assert!(mine.receiver.try_recv().is_ok());
        assert!(tickets.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_closes_receivers() {
        let feed = MemoryChangeFeed::new(8);
        let mut sub = feed.subscribe(ChangeFilter::all(EntityType::Appointment)).await.unwrap();
        assert_eq!(feed.disconnect_all(), 1);
        assert!(sub.receiver.recv().await.is_none());
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let feed = MemoryChangeFeed::new(8);
        let sub = feed.subscribe(ChangeFilter::all(EntityType::Registration)).await.unwrap();
        feed.unsubscribe(sub.id).await;
        assert_eq!(feed.subscriber_count(), 0);
    }
}
