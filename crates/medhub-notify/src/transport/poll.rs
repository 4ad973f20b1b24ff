//! Polling backstop: periodic full re-detection.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use medhub_core::result::AppResult;
use medhub_entity::DomainRecords;

use crate::feed::SubjectFeed;
use crate::rules::RuleEngine;
use crate::source::EventSource;
use crate::subject::SubjectKey;

/// Run detection over a snapshot and merge the result into the feed.
pub(crate) async fn absorb(
    subject: &SubjectKey,
    engine: &RuleEngine,
    feed: &SubjectFeed,
    snapshot: &DomainRecords,
) -> usize {
    let existing = feed.existing_ids().await;
    let detected = engine.detect(Utc::now(), &existing, snapshot);
    feed.merge(subject, detected).await
}

/// Fetches a fresh snapshot on a fixed interval and merges what it finds.
#[derive(Debug)]
pub struct Poller {
    subject: SubjectKey,
    engine: RuleEngine,
    feed: Arc<SubjectFeed>,
    source: Arc<dyn EventSource>,
    interval: Duration,
}

impl Poller {
    /// Create a poller ticking every `interval`.
    pub fn new(
        engine: RuleEngine,
        feed: Arc<SubjectFeed>,
        source: Arc<dyn EventSource>,
        interval: Duration,
    ) -> Self {
        Self {
            subject: *engine.subject(),
            engine,
            feed,
            source,
            interval,
        }
    }

    /// One fetch, detect and merge cycle. Returns the number of entries added.
    pub async fn poll_once(&self) -> AppResult<usize> {
        let snapshot = self.source.fetch_domain_records(&self.subject).await?;
        Ok(absorb(&self.subject, &self.engine, &self.feed, &snapshot).await)
    }

    /// Poll until cancelled. The first cycle runs immediately.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            "Poller started for {}, interval={}s",
            self.subject,
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    match self.poll_once().await {
                        Ok(0) => tracing::trace!("Poll for {} found nothing new", self.subject),
                        Ok(added) => tracing::debug!("Poll for {} added {} notifications", self.subject, added),
                        Err(e) => tracing::warn!("Poll for {} failed, retrying next tick: {}", self.subject, e),
                    }
                }
            }
        }

        tracing::info!("Poller for {} stopped", self.subject);
    }
}
