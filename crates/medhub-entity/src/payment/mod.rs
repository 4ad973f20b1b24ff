//! Payment records.

pub mod model;
pub mod status;

pub use model::{Payment, PaymentPurpose};
pub use status::{PaymentMethod, PaymentStatus};
