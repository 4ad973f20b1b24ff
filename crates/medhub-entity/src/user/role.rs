//! Notification-bearing role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::notification::source::ReadFlag;

/// Roles that own a notification feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A patient booking appointments.
    Patient,
    /// A doctor receiving appointments and paying subscriptions.
    Doctor,
    /// A seller referring doctors and earning commissions.
    Seller,
    /// A clinic secretary managing appointments for a clinic.
    Clinic,
    /// Platform administrator reviewing tickets, payments and registrations.
    Admin,
}

impl Role {
    /// Every role, in a stable order.
    pub const ALL: [Role; 5] = [
        Role::Patient,
        Role::Doctor,
        Role::Seller,
        Role::Clinic,
        Role::Admin,
    ];

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Seller => "seller",
            Self::Clinic => "clinic",
            Self::Admin => "admin",
        }
    }

    /// The per-record read flag this role consumes.
    pub fn read_flag(&self) -> ReadFlag {
        match self {
            Self::Patient => ReadFlag::Patient,
            Self::Doctor => ReadFlag::Doctor,
            Self::Seller => ReadFlag::Seller,
            Self::Clinic => ReadFlag::Clinic,
            Self::Admin => ReadFlag::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
        }
    }

    #[test]
    fn test_read_flag_column() {
        assert_eq!(Role::Seller.read_flag().column(), "read_by_seller");
        assert_eq!(Role::Admin.read_flag().column(), "read_by_admin");
    }
}
