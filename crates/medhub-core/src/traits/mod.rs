//! Core traits defined in `medhub-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
