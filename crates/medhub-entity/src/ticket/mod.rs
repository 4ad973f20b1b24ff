//! Support ticket records.

pub mod model;

pub use model::{SupportTicket, TicketStatus};
