//! Push listener: turns change-feed events into notifications.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt};
use tokio_util::sync::CancellationToken;

use medhub_core::error::AppError;
use medhub_core::events::ChangeEvent;
use medhub_core::result::AppResult;
use medhub_core::types::SubscriptionId;

use crate::feed::SubjectFeed;
use crate::rules::RuleEngine;
use crate::subject::SubjectKey;

use super::channel::{ChangeFeed, ChangeFilter};

/// One item of the merged subscription stream; `None` marks a dropped channel.
type Delivery = Option<ChangeEvent>;

/// Listens to the subject's change subscriptions for the session's lifetime.
#[derive(Debug)]
pub struct PushListener {
    subject: SubjectKey,
    engine: RuleEngine,
    feed: Arc<SubjectFeed>,
    changes: Arc<dyn ChangeFeed>,
    backoff: Duration,
}

impl PushListener {
    /// Create a listener; `backoff` is the delay before resubscribing.
    pub fn new(
        engine: RuleEngine,
        feed: Arc<SubjectFeed>,
        changes: Arc<dyn ChangeFeed>,
        backoff: Duration,
    ) -> Self {
        Self {
            subject: *engine.subject(),
            engine,
            feed,
            changes,
            backoff,
        }
    }

    /// The filters covering the role's scopes.
    pub fn filters(&self) -> Vec<ChangeFilter> {
        self.engine
            .rule_set()
            .scopes
            .iter()
            .map(|scope| ChangeFilter::for_scope(scope, &self.subject))
            .collect()
    }

    /// Synthesize and merge the events of one change. Returns how many
    /// entries were added.
    pub async fn handle(&self, change: &ChangeEvent) -> usize {
        match self.engine.synthesize(Utc::now(), change) {
            Ok(events) => self.feed.merge(&self.subject, events).await,
            Err(e) => {
                tracing::warn!(
                    subject = %self.subject,
                    entity = %change.entity,
                    error = %e,
                    "Skipping change event"
                );
                0
            }
        }
    }

    /// Run until cancelled, resubscribing with back-off whenever a
    /// subscription drops.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!("Push listener started for {}", self.subject);

        loop {
            let (ids, mut deliveries) = match self.open().await {
                Ok(opened) => opened,
                Err(e) => {
                    tracing::warn!(
                        "Push subscribe failed for {}: {}, retrying in {:?}",
                        self.subject,
                        e,
                        self.backoff
                    );
                    if self.wait_backoff(&cancel).await {
                        continue;
                    }
                    break;
                }
            };

            let outcome = self.listen(&mut deliveries, &cancel).await;
            self.close(ids).await;
            if let Err(e) = outcome {
                tracing::warn!(
                    "Push listener for {}: {}, resubscribing in {:?}",
                    self.subject,
                    e,
                    self.backoff
                );
                if self.wait_backoff(&cancel).await {
                    continue;
                }
            }
            break;
        }

        tracing::info!("Push listener for {} stopped", self.subject);
    }

    /// Apply deliveries until cancelled (`Ok`) or until a subscription drops
    /// (`ServiceUnavailable`).
    async fn listen(
        &self,
        deliveries: &mut BoxStream<'static, Delivery>,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                next = deliveries.next() => match next {
                    Some(Some(change)) => {
                        self.handle(&change).await;
                    }
                    Some(None) | None => {
                        return Err(AppError::service_unavailable("change subscription closed"));
                    }
                }
            }
        }
    }

    /// Subscribe every scope and merge the receivers into one stream.
    async fn open(&self) -> AppResult<(Vec<SubscriptionId>, BoxStream<'static, Delivery>)> {
        let mut ids = Vec::new();
        let mut streams = Vec::new();
        for filter in self.filters() {
            match self.changes.subscribe(filter).await {
                Ok(sub) => {
                    ids.push(sub.id);
                    streams.push(delivery_stream(sub.receiver));
                }
                Err(e) => {
                    self.close(ids).await;
                    return Err(e);
                }
            }
        }
        tracing::debug!(
            "Push listener for {} holds {} subscriptions",
            self.subject,
            ids.len()
        );
        Ok((ids, stream::select_all(streams).boxed()))
    }

    async fn close(&self, ids: Vec<SubscriptionId>) {
        for id in ids {
            self.changes.unsubscribe(id).await;
        }
    }

    /// Sleep for the back-off. Returns `false` if cancelled meanwhile.
    async fn wait_backoff(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.backoff) => true,
        }
    }
}

/// Receiver as a stream that ends with a single `None` once the sender side is gone.
fn delivery_stream(
    mut receiver: tokio::sync::mpsc::Receiver<ChangeEvent>,
) -> BoxStream<'static, Delivery> {
    stream::poll_fn(move |cx| receiver.poll_recv(cx))
        .map(Some)
        .chain(stream::once(async { None }))
        .boxed()
}
