//! # medhub-core
//!
//! Core crate for the MedHub notification engine. Contains the cache
//! provider trait, configuration schemas, typed identifiers, record
//! change events, logging setup, and the unified error system.
//!
//! This crate has **no** internal dependencies on other MedHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
