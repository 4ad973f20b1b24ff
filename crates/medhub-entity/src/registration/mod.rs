//! Doctor registration records.

pub mod model;

pub use model::{DoctorRegistration, RegistrationStatus};
