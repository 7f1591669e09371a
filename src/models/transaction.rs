//! Transaction model
//!
//! The immutable record of one expense and how it was split.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, GroupId, TransactionId};
use super::money::Money;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    pub description: String,

    /// Total amount of the expense
    pub amount: Money,

    pub category_id: CategoryId,

    /// Account that paid
    pub payer: AccountId,

    /// Group the expense was split across, if any
    pub group_id: Option<GroupId>,

    /// Accounts debited, captured when the expense was allocated
    pub participants: Vec<AccountId>,

    /// Amount debited from each participant
    pub share: Money,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Whether the account took part in this expense
    pub fn involves(&self, account: AccountId) -> bool {
        self.payer == account || self.participants.contains(&account)
    }

    /// Sum of all participant deductions
    pub fn allocated_total(&self) -> Money {
        self.share.times(self.participants.len())
    }

    /// Whether the shares add back up to the amount
    pub fn is_balanced(&self) -> bool {
        self.allocated_total().approx_eq(self.amount)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} x {})",
            self.description,
            self.amount,
            self.participants.len(),
            self.share
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_split() {
        let payer = AccountId::new();
        let participants = vec![payer, AccountId::new(), AccountId::new()];
        let txn = Transaction {
            id: TransactionId::new(),
            description: "Groceries".into(),
            amount: Money::new(100.0),
            category_id: "food".into(),
            payer,
            group_id: Some(GroupId::new()),
            share: Money::new(100.0).split(participants.len()).unwrap(),
            participants,
            created_at: Utc::now(),
        };

        assert!(txn.is_balanced());
        assert!(txn.involves(payer));
        assert!(!txn.involves(AccountId::new()));
    }
}
