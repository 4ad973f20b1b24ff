//! Support ticket entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medhub_core::types::{SubjectId, TicketId};

use crate::user::Role;

/// Ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Waiting for an admin.
    Open,
    /// An admin replied.
    Answered,
    /// Resolved and closed.
    Closed,
}

/// A support ticket opened by a doctor or seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    /// Unique ticket identifier.
    pub id: TicketId,
    /// The user who opened the ticket.
    pub owner_id: SubjectId,
    /// Role of the user who opened the ticket.
    pub owner_role: Role,
    /// Ticket subject line.
    pub subject: String,
    /// Lifecycle status.
    pub status: TicketStatus,
    /// Latest admin reply.
    #[serde(default)]
    pub admin_reply: Option<String>,
    /// When the latest admin reply was posted.
    #[serde(default)]
    pub replied_at: Option<DateTime<Utc>>,
    /// Whether the owning doctor has seen the latest reply.
    #[serde(default)]
    pub read_by_doctor: bool,
    /// Whether the owning seller has seen the latest reply.
    #[serde(default)]
    pub read_by_seller: bool,
    /// Whether an admin has seen the ticket.
    #[serde(default)]
    pub read_by_admin: bool,
    /// When the ticket was opened.
    pub created_at: DateTime<Utc>,
}

impl SupportTicket {
    /// The reply and its timestamp, when an admin has answered.
    pub fn reply(&self) -> Option<(&str, DateTime<Utc>)> {
        match (&self.admin_reply, self.replied_at) {
            (Some(body), Some(at)) if !body.trim().is_empty() => Some((body.as_str(), at)),
            _ => None,
        }
    }
}
