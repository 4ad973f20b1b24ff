//! Read-state synchronization: local read transitions plus queued
//! backend flag writes.

pub mod batch;
pub mod queue;
pub mod writer;

pub use batch::{ReadFlagBatch, ReadStateBatch, mark_all_read, mark_read};
pub use queue::ReadSyncQueue;
pub use writer::ReadFlagWriter;
