//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use medhub_cache::memory::MemoryCacheProvider;
use medhub_core::config::NotificationsConfig;
use medhub_core::error::AppError;
use medhub_core::result::AppResult;
use medhub_core::types::{AppointmentId, PaymentId, SubjectId};
use medhub_entity::DomainRecords;
use medhub_entity::appointment::{Appointment, AppointmentStatus};
use medhub_entity::payment::{Payment, PaymentMethod, PaymentPurpose, PaymentStatus};
use medhub_notify::{
    EventSource, FeedStore, MemoryChangeFeed, NotificationEngine, ReadFlagBatch, ReadFlagWriter,
    SubjectKey,
};

/// Event source returning whatever snapshot the test sets.
#[derive(Debug, Default)]
pub struct StaticEventSource {
    records: Mutex<DomainRecords>,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl StaticEventSource {
    /// Replace the snapshot.
    pub fn set(&self, records: DomainRecords) {
        *self.records.lock().expect("source lock") = records;
    }

    /// Make every fetch fail until reset.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetch attempts so far.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    async fn fetch_domain_records(&self, _subject: &SubjectKey) -> AppResult<DomainRecords> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external("record store unreachable"));
        }
        Ok(self.records.lock().expect("source lock").clone())
    }
}

/// Flag writer recording every batch it receives.
#[derive(Debug, Default)]
pub struct RecordingFlagWriter {
    calls: Mutex<Vec<ReadFlagBatch>>,
    failing: AtomicBool,
    stalled: AtomicBool,
}

impl RecordingFlagWriter {
    /// Batches received so far.
    pub fn calls(&self) -> Vec<ReadFlagBatch> {
        self.calls.lock().expect("writer lock").clone()
    }

    /// Make every write fail.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every write hang forever after being recorded.
    pub fn stall(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReadFlagWriter for RecordingFlagWriter {
    async fn mark_read(&self, batch: &ReadFlagBatch) -> AppResult<u64> {
        self.calls.lock().expect("writer lock").push(batch.clone());
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external("update rejected"));
        }
        Ok(batch.record_ids.len() as u64)
    }
}

/// Test application context.
pub struct TestApp {
    /// The engine under test.
    pub engine: NotificationEngine,
    /// Backing cache, for direct inspection.
    pub cache: Arc<MemoryCacheProvider>,
    /// Feed storage over the same cache.
    pub store: FeedStore,
    /// In-memory change feed.
    pub changes: Arc<MemoryChangeFeed>,
    /// Snapshot source.
    pub source: Arc<StaticEventSource>,
    /// Read-flag writer.
    pub flags: Arc<RecordingFlagWriter>,
}

impl TestApp {
    /// An engine with both transports disabled; detection is driven by hand.
    pub fn manual() -> Self {
        Self::with_config(NotificationsConfig {
            polling_enabled: false,
            push_enabled: false,
            ..NotificationsConfig::default()
        })
    }

    /// An engine with only the push listener running.
    pub fn push_only() -> Self {
        Self::with_config(NotificationsConfig {
            polling_enabled: false,
            push_enabled: true,
            resubscribe_backoff_seconds: 1,
            ..NotificationsConfig::default()
        })
    }

    /// An engine with only the poller running.
    pub fn poll_only() -> Self {
        Self::with_config(NotificationsConfig {
            polling_enabled: true,
            push_enabled: false,
            ..NotificationsConfig::default()
        })
    }

    /// Create a test application with explicit notification settings.
    pub fn with_config(config: NotificationsConfig) -> Self {
        let cache = Arc::new(MemoryCacheProvider::default());
        let changes = Arc::new(MemoryChangeFeed::new(config.push_buffer_size));
        let source = Arc::new(StaticEventSource::default());
        let flags = Arc::new(RecordingFlagWriter::default());
        let engine = NotificationEngine::with_cache(
            cache.clone(),
            config,
            source.clone(),
            changes.clone(),
            flags.clone(),
        );
        Self {
            engine,
            store: FeedStore::new(cache.clone()),
            cache,
            changes,
            source,
            flags,
        }
    }
}

/// Poll `cond` until it holds, failing the test after five seconds.
pub async fn wait_until(what: &str, cond: impl Fn() -> bool) {
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "timed out waiting for {what}");
}

/// A pending, unread appointment.
pub fn appointment(
    patient: SubjectId,
    doctor: SubjectId,
    scheduled_at: DateTime<Utc>,
) -> Appointment {
    Appointment {
        id: AppointmentId::new(),
        patient_id: patient,
        doctor_id: doctor,
        clinic_id: None,
        patient_name: "Ana Lima".to_string(),
        doctor_name: "Dr. Ruiz".to_string(),
        scheduled_at,
        status: AppointmentStatus::Pending,
        patient_response: None,
        payment_method: PaymentMethod::Card,
        payment_status: PaymentStatus::Pending,
        payment_proof_url: None,
        attendance: None,
        clinical_note: None,
        prescription: None,
        last_message: None,
        read_by_patient: false,
        read_by_doctor: false,
        read_by_clinic: false,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// A paid, unread commission.
pub fn commission(seller: SubjectId) -> Payment {
    Payment {
        id: PaymentId::new(),
        owner_id: seller,
        purpose: PaymentPurpose::Commission,
        amount_cents: 15_000,
        currency: "USD".to_string(),
        status: PaymentStatus::Paid,
        method: PaymentMethod::Transfer,
        description: None,
        read_by_doctor: false,
        read_by_seller: false,
        read_by_admin: false,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// Snapshot holding only appointments.
pub fn appointments(items: Vec<Appointment>) -> DomainRecords {
    DomainRecords {
        appointments: items,
        ..DomainRecords::default()
    }
}
