//! Appointment records.

pub mod message;
pub mod model;
pub mod status;

pub use message::ChatMessage;
pub use model::Appointment;
pub use status::{AppointmentStatus, Attendance, PatientResponse};
