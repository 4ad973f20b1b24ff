//! Delivery transport: push subscription plus polling backstop, both
//! feeding the same idempotent merge.

pub mod channel;
pub mod memory;
pub mod poll;
pub mod push;

pub use channel::{ChangeFeed, ChangeFilter, ChangeSubscription};
pub use memory::MemoryChangeFeed;
pub use poll::Poller;
pub use push::PushListener;
