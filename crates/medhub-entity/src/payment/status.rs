//! Payment status and method enumerations.

use serde::{Deserialize, Serialize};

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Submitted, awaiting verification.
    Pending,
    /// Verified and accepted.
    Approved,
    /// Verification failed.
    Rejected,
    /// Paid out (commissions).
    Paid,
}

impl PaymentStatus {
    /// Return the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Paid => "paid",
        }
    }
}

/// How a payment is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bank transfer with an uploaded proof, verified manually.
    Transfer,
    /// Cash at the front desk.
    Cash,
    /// Card, settled by the payment provider.
    Card,
}
