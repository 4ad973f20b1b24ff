//! Event source adapter: snapshot reads from the record store.

use async_trait::async_trait;

use medhub_core::result::AppResult;
use medhub_entity::DomainRecords;

use crate::subject::SubjectKey;

/// Fetches the current records relevant to one subject.
///
/// Implementations pre-filter to what the subject owns (a doctor's own
/// appointments, a seller's referrals); admin subjects see everything.
/// Failures are treated as transient by the polling loop.
#[async_trait]
pub trait EventSource: Send + Sync + std::fmt::Debug + 'static {
    /// Point-in-time snapshot of appointments, payments, tickets and registrations.
    async fn fetch_domain_records(&self, subject: &SubjectKey) -> AppResult<DomainRecords>;
}
