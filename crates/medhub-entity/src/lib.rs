//! # medhub-entity
//!
//! Domain models consumed by the MedHub notification engine. The record
//! structs mirror rows of the external record store (appointments,
//! payments, support tickets, doctor registrations); the notification
//! module holds the feed entry model persisted per subject.
//!
//! All records derive `Debug`, `Clone`, `Serialize` and `Deserialize` so
//! they can be decoded straight from change-feed payloads.

pub mod appointment;
pub mod notification;
pub mod payment;
pub mod registration;
pub mod snapshot;
pub mod ticket;
pub mod user;

pub use snapshot::DomainRecords;
