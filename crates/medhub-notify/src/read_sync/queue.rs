//! Per-session queue draining read-state batches to the record store.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::subject::SubjectKey;

use super::batch::ReadStateBatch;
use super::writer::ReadFlagWriter;

/// Handle for enqueuing batches onto the session's background writer.
#[derive(Debug, Clone)]
pub struct ReadSyncQueue {
    tx: mpsc::Sender<ReadStateBatch>,
}

impl ReadSyncQueue {
    /// Spawn the writer task; it stops when `cancel` fires, after draining
    /// whatever was already queued.
    pub fn spawn(
        subject: SubjectKey,
        writer: Arc<dyn ReadFlagWriter>,
        capacity: usize,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run(subject, writer, rx, cancel));
        (Self { tx }, handle)
    }

    /// Queue a batch without waiting. Empty batches are dropped.
    ///
    /// Never fails towards the caller: when the queue is full or the
    /// worker is gone the batch is logged and discarded, leaving the
    /// backend flags stale while the local read state stays as it is.
    /// Returns whether the batch was queued.
    pub fn enqueue(&self, batch: ReadStateBatch) -> bool {
        if batch.is_empty() {
            return false;
        }
        match self.tx.try_send(batch) {
            Ok(()) => true,
            Err(TrySendError::Full(batch)) => {
                tracing::warn!(
                    records = batch.record_count(),
                    "Read sync queue full, dropping read-flag batch"
                );
                false
            }
            Err(TrySendError::Closed(batch)) => {
                tracing::warn!(
                    records = batch.record_count(),
                    "Read sync worker stopped, dropping read-flag batch"
                );
                false
            }
        }
    }
}

async fn run(
    subject: SubjectKey,
    writer: Arc<dyn ReadFlagWriter>,
    mut rx: mpsc::Receiver<ReadStateBatch>,
    cancel: CancellationToken,
) {
    tracing::debug!("Read sync worker started for {}", subject);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                rx.close();
                while let Some(batch) = rx.recv().await {
                    apply(&subject, writer.as_ref(), batch).await;
                }
                break;
            }
            next = rx.recv() => match next {
                Some(batch) => apply(&subject, writer.as_ref(), batch).await,
                None => break,
            }
        }
    }

    tracing::debug!("Read sync worker for {} stopped", subject);
}

async fn apply(subject: &SubjectKey, writer: &dyn ReadFlagWriter, batch: ReadStateBatch) {
    for group in batch.into_groups() {
        match writer.mark_read(&group).await {
            Ok(updated) => tracing::debug!(
                %subject,
                record_type = %group.record_type,
                flag = %group.flag,
                updated,
                "Read flags synced"
            ),
            Err(e) => tracing::error!(
                %subject,
                record_type = %group.record_type,
                flag = %group.flag,
                records = group.record_ids.len(),
                error = %e,
                "Failed to sync read flags"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use medhub_core::events::EntityType;
    use medhub_core::result::AppResult;
    use medhub_core::types::SubjectId;
    use medhub_entity::notification::{ReadFlag, RecordRef};
    use medhub_entity::user::Role;
    use uuid::Uuid;

    use crate::read_sync::ReadFlagBatch;

    /// A record store that accepts the call and never answers.
    #[derive(Debug, Default)]
    struct StalledWriter {
        started: AtomicUsize,
    }

    #[async_trait]
    impl ReadFlagWriter for StalledWriter {
        async fn mark_read(&self, _batch: &ReadFlagBatch) -> AppResult<u64> {
            self.started.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    fn single(record_type: EntityType) -> ReadStateBatch {
        let mut batch = ReadStateBatch::new();
        batch.push(RecordRef::new(record_type, Uuid::new_v4()), ReadFlag::Doctor);
        batch
    }

    #[tokio::test]
    async fn test_enqueue_never_waits_on_stalled_writer() {
        let writer = Arc::new(StalledWriter::default());
        let cancel = CancellationToken::new();
        let subject = SubjectKey::new(Role::Doctor, SubjectId::new());
        let (queue, handle) = ReadSyncQueue::spawn(subject, writer.clone(), 1, cancel.clone());

        assert!(queue.enqueue(single(EntityType::Appointment)));
        tokio::time::timeout(Duration::from_secs(1), async {
            while writer.started.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        // The worker is stuck on the first batch; one more fits, the rest are dropped.
        assert!(queue.enqueue(single(EntityType::Payment)));
        assert!(!queue.enqueue(single(EntityType::Ticket)));
        assert!(!queue.enqueue(single(EntityType::Registration)));

        cancel.cancel();
        handle.abort();
    }

    #[tokio::test]
    async fn test_empty_batch_is_not_queued() {
        let writer = Arc::new(StalledWriter::default());
        let subject = SubjectKey::new(Role::Seller, SubjectId::new());
        let (queue, handle) =
            ReadSyncQueue::spawn(subject, writer.clone(), 4, CancellationToken::new());

        assert!(!queue.enqueue(ReadStateBatch::new()));
        handle.abort();
        assert_eq!(writer.started.load(Ordering::SeqCst), 0);
    }
}
