//! Deduplicating, ordered feed storage.

pub mod live;
pub mod merge;
pub mod store;

pub use live::{FeedView, SubjectFeed};
pub use store::FeedStore;
