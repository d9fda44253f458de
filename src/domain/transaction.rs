use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, UserId};

pub type TransactionId = i64;

/// Transfers at or above this amount are held for explicit approval.
pub const APPROVAL_THRESHOLD: Cents = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// Held for approval; the origin is debited but the destination
    /// is only credited once the transaction is approved
    Pending,
    /// Settled; the destination has been credited
    Approved,
    /// Settled; the origin has been refunded
    Rejected,
}

impl TransactionStatus {
    /// Initial status for a new transfer of the given amount.
    /// Amounts at or above the approval threshold are held as pending.
    pub fn for_amount(amount_cents: Cents) -> Self {
        if amount_cents >= APPROVAL_THRESHOLD {
            TransactionStatus::Pending
        } else {
            TransactionStatus::Approved
        }
    }

    /// Returns true once the transaction has reached a terminal status.
    /// Settled transactions never change status again.
    pub fn is_settled(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Approved => "APPROVED",
            TransactionStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(TransactionStatus::Pending),
            "APPROVED" => Some(TransactionStatus::Approved),
            "REJECTED" => Some(TransactionStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A money movement between two users.
/// Rows are immutable except for the single status transition out of
/// `Pending` into `Approved` or `Rejected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Debited user
    pub origin_id: UserId,
    /// Credited user (on approval)
    pub destination_id: UserId,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Approved,
            TransactionStatus::Rejected,
        ] {
            let parsed = TransactionStatus::from_str(status.as_str()).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_status_from_str_is_case_insensitive() {
        assert_eq!(
            TransactionStatus::from_str("approved"),
            Some(TransactionStatus::Approved)
        );
        assert_eq!(TransactionStatus::from_str("bogus"), None);
    }

    #[test]
    fn test_small_amounts_settle_immediately() {
        assert_eq!(
            TransactionStatus::for_amount(100),
            TransactionStatus::Approved
        );
        assert_eq!(
            TransactionStatus::for_amount(APPROVAL_THRESHOLD - 1),
            TransactionStatus::Approved
        );
    }

    #[test]
    fn test_large_amounts_are_held() {
        assert_eq!(
            TransactionStatus::for_amount(60_000),
            TransactionStatus::Pending
        );
        // Exactly the threshold is held for approval too
        assert_eq!(
            TransactionStatus::for_amount(APPROVAL_THRESHOLD),
            TransactionStatus::Pending
        );
    }

    #[test]
    fn test_settled_statuses() {
        assert!(!TransactionStatus::Pending.is_settled());
        assert!(TransactionStatus::Approved.is_settled());
        assert!(TransactionStatus::Rejected.is_settled());
    }
}
