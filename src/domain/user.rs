use serde::{Deserialize, Serialize};

use super::Cents;

pub type UserId = i64;

/// A user account holding a spendable balance.
/// The balance is only mutated by transfer processing and settlement;
/// a transfer debit must never take it below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Current balance in cents
    pub balance_cents: Cents,
}

impl User {
    /// Returns true if this user can cover a debit of the given amount.
    pub fn can_cover(&self, amount_cents: Cents) -> bool {
        self.balance_cents >= amount_cents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_cover() {
        let user = User {
            id: 1,
            name: "Alice".into(),
            email: "alice@example.com".into(),
            balance_cents: 1000,
        };
        assert!(user.can_cover(1000));
        assert!(user.can_cover(999));
        assert!(!user.can_cover(1001));
    }
}
