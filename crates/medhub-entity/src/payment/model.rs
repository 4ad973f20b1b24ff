//! Payment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medhub_core::types::{PaymentId, SubjectId};

use super::status::{PaymentMethod, PaymentStatus};

/// What a platform payment is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPurpose {
    /// A doctor paying for a platform subscription.
    Subscription,
    /// A commission owed to a seller for a referral.
    Commission,
}

/// A platform-level payment (not a consultation fee).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment identifier.
    pub id: PaymentId,
    /// The account the payment belongs to: the paying doctor for
    /// subscriptions, the earning seller for commissions.
    pub owner_id: SubjectId,
    /// Subscription or commission.
    pub purpose: PaymentPurpose,
    /// Amount in minor currency units.
    pub amount_cents: i64,
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Settlement state.
    pub status: PaymentStatus,
    /// Settlement method.
    pub method: PaymentMethod,
    /// Plan or period label shown to the owner.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the doctor has seen the latest state.
    #[serde(default)]
    pub read_by_doctor: bool,
    /// Whether the seller has seen the latest state.
    #[serde(default)]
    pub read_by_seller: bool,
    /// Whether an admin has seen the latest state.
    #[serde(default)]
    pub read_by_admin: bool,
    /// When the payment was submitted.
    pub created_at: DateTime<Utc>,
    /// When the status last changed.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Formatted amount, e.g. `"120.50 USD"`.
    pub fn display_amount(&self) -> String {
        format!(
            "{}.{:02} {}",
            self.amount_cents / 100,
            (self.amount_cents % 100).abs(),
            self.currency
        )
    }

    /// Last time the status changed.
    pub fn last_change(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_amount() {
        let payment: Payment = serde_json::from_value(serde_json::json!({
            "id": "1b2c3d4e-0000-4000-8000-000000000001",
            "owner_id": "1b2c3d4e-0000-4000-8000-000000000002",
            "purpose": "commission",
            "amount_cents": 12050,
            "status": "paid",
            "method": "transfer",
            "created_at": "2026-04-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(payment.display_amount(), "120.50 USD");
        assert!(!payment.read_by_seller);
    }
}
