//! Chat message value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medhub_core::types::MessageId;

use crate::user::Role;

/// The latest message exchanged on an appointment thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identifier.
    pub id: MessageId,
    /// Role of the author.
    pub sender_role: Role,
    /// Display name of the author.
    pub sender_name: String,
    /// Message text.
    pub body: String,
    /// When the message was sent.
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// A short single-line preview of the body.
    pub fn preview(&self, max_chars: usize) -> String {
        let line = self.body.lines().next().unwrap_or_default();
        if line.chars().count() <= max_chars {
            line.to_string()
        } else {
            let cut: String = line.chars().take(max_chars).collect();
            format!("{cut}…")
        }
    }
}
