//! Notification engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Detection and delivery settings for subject sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Interval of the polling backstop in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Whether the polling loop runs at all.
    #[serde(default = "default_true")]
    pub polling_enabled: bool,
    /// Whether the push listener runs at all.
    #[serde(default = "default_true")]
    pub push_enabled: bool,
    /// Lead time of the early appointment reminder, in hours.
    #[serde(default = "default_long_lead")]
    pub reminder_long_lead_hours: u32,
    /// Lead time of the late appointment reminder, in hours.
    #[serde(default = "default_short_lead")]
    pub reminder_short_lead_hours: u32,
    /// How long after the appointment moment a reminder may still fire, in minutes.
    #[serde(default)]
    pub reminder_grace_minutes: u32,
    /// Buffer size of a change-feed subscription.
    #[serde(default = "default_push_buffer")]
    pub push_buffer_size: usize,
    /// Delay before resubscribing after the push channel dropped, in seconds.
    #[serde(default = "default_resubscribe_backoff")]
    pub resubscribe_backoff_seconds: u64,
    /// Capacity of the per-session read-flag batch queue.
    #[serde(default = "default_read_sync_queue")]
    pub read_sync_queue_size: usize,
}

impl NotificationsConfig {
    /// Polling interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds.max(1))
    }

    /// Resubscribe back-off as a [`Duration`].
    pub fn resubscribe_backoff(&self) -> Duration {
        Duration::from_secs(self.resubscribe_backoff_seconds)
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            polling_enabled: true,
            push_enabled: true,
            reminder_long_lead_hours: default_long_lead(),
            reminder_short_lead_hours: default_short_lead(),
            reminder_grace_minutes: 0,
            push_buffer_size: default_push_buffer(),
            resubscribe_backoff_seconds: default_resubscribe_backoff(),
            read_sync_queue_size: default_read_sync_queue(),
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_long_lead() -> u32 {
    24
}

fn default_short_lead() -> u32 {
    3
}

fn default_push_buffer() -> usize {
    256
}

fn default_resubscribe_backoff() -> u64 {
    5
}

fn default_read_sync_queue() -> usize {
    32
}
