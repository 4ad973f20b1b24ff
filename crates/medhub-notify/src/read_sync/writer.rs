//! Outbound port to the record store for read-flag updates.

use async_trait::async_trait;

use medhub_core::result::AppResult;

use super::batch::ReadFlagBatch;

/// Flips `flag = true` on a set of records in one targeted update.
#[async_trait]
pub trait ReadFlagWriter: Send + Sync + std::fmt::Debug + 'static {
    /// Apply one batch; returns the number of rows updated.
    async fn mark_read(&self, batch: &ReadFlagBatch) -> AppResult<u64>;
}
