//! # medhub-notify
//!
//! Notification aggregation and delivery for MedHub subjects. Provides:
//!
//! - Per-role rule tables detecting notifications from domain records
//! - A deduplicating, ordered feed per subject, persisted to the cache
//! - Push delivery from a change feed, with a polling backstop
//! - Read-state sync batching backend read-flag updates
//! - A session registry keeping one live subject per role

pub mod engine;
pub mod feed;
pub mod read_sync;
pub mod rules;
pub mod session;
pub mod source;
pub mod subject;
pub mod transport;

pub use engine::NotificationEngine;
pub use feed::{FeedStore, FeedView, SubjectFeed};
pub use read_sync::{ReadFlagBatch, ReadFlagWriter, ReadStateBatch};
pub use rules::{ReminderPolicy, RuleEngine};
pub use session::{SessionRegistry, SubjectSession};
pub use source::EventSource;
pub use subject::SubjectKey;
pub use transport::{ChangeFeed, ChangeFilter, MemoryChangeFeed};
