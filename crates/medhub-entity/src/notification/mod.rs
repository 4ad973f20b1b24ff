//! Notification feed entities.

pub mod kind;
pub mod model;
pub mod source;

pub use kind::NotificationKind;
pub use model::NotificationEvent;
pub use source::{ReadFlag, RecordRef};
