//! Expense allocation
//!
//! Resolves who takes part in an expense and how much each participant owes.
//! Read-only: nothing is written here.

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{AccountId, GroupId, Money};

/// Participants of an expense and the share each one is debited
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Participants in group order; a repeated member appears repeatedly
    pub participants: Vec<AccountId>,
    pub share: Money,
}

impl Allocation {
    /// How many times `account` appears among the participants
    pub fn occurrences(&self, account: AccountId) -> usize {
        self.participants.iter().filter(|p| **p == account).count()
    }

    /// Total debited from `account` by this allocation
    pub fn deduction_for(&self, account: AccountId) -> Money {
        self.share.times(self.occurrences(account))
    }

    /// Distinct participants with their occurrence counts, first-seen order
    pub fn units(&self) -> Vec<(AccountId, usize)> {
        let mut units: Vec<(AccountId, usize)> = Vec::new();
        for participant in &self.participants {
            match units.iter_mut().find(|(id, _)| id == participant) {
                Some((_, count)) => *count += 1,
                None => units.push((*participant, 1)),
            }
        }
        units
    }
}

/// Split `amount` evenly across `participants`
pub fn split_evenly(amount: Money, participants: Vec<AccountId>) -> LedgerResult<Allocation> {
    if !amount.is_valid_positive() {
        return Err(LedgerError::InvalidBudget(format!(
            "expense amount must be positive, got {}",
            amount.value()
        )));
    }

    let share = amount.split(participants.len()).ok_or_else(|| {
        LedgerError::Validation("an expense needs at least one participant".into())
    })?;

    Ok(Allocation {
        participants,
        share,
    })
}

/// Resolves participant sets against the group directory
pub struct ExpenseAllocator<'a> {
    ledger: &'a Ledger,
}

impl<'a> ExpenseAllocator<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Allocate an expense paid by `payer`
    ///
    /// Without a group the payer carries the whole amount. With a group the
    /// amount is split evenly across the group's member list as it stands now.
    pub async fn allocate(
        &self,
        payer: AccountId,
        amount: Money,
        group: Option<GroupId>,
    ) -> LedgerResult<Allocation> {
        let Some(group_id) = group else {
            return split_evenly(amount, vec![payer]);
        };

        if !amount.is_valid_positive() {
            return Err(LedgerError::InvalidBudget(format!(
                "expense amount must be positive, got {}",
                amount.value()
            )));
        }

        let group = self
            .ledger
            .stores
            .groups
            .get(group_id)
            .await?
            .ok_or_else(|| LedgerError::group_not_found(group_id))?;

        if !group.is_member(payer) {
            return Err(LedgerError::Validation(format!(
                "payer {} is not a member of group {}",
                payer, group.name
            )));
        }

        split_evenly(amount, group.members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_participant_carries_full_amount() {
        let payer = AccountId::new();
        let allocation = split_evenly(Money::new(42.5), vec![payer]).unwrap();
        assert_eq!(allocation.share, Money::new(42.5));
        assert_eq!(allocation.participants, vec![payer]);
    }

    #[test]
    fn test_four_way_split() {
        let members: Vec<_> = (0..4).map(|_| AccountId::new()).collect();
        let allocation = split_evenly(Money::new(100.0), members.clone()).unwrap();
        assert_eq!(allocation.share, Money::new(25.0));
        assert_eq!(allocation.participants, members);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let a = AccountId::new();
        let b = AccountId::new();
        let allocation = split_evenly(Money::new(90.0), vec![a, b, a]).unwrap();

        assert_eq!(allocation.share, Money::new(30.0));
        assert_eq!(allocation.occurrences(a), 2);
        assert_eq!(allocation.deduction_for(a), Money::new(60.0));
        assert_eq!(allocation.units(), vec![(a, 2), (b, 1)]);
    }

    #[test]
    fn test_invalid_amounts() {
        let payer = AccountId::new();
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                split_evenly(Money::new(amount), vec![payer]),
                Err(LedgerError::InvalidBudget(_))
            ));
        }
    }

    #[test]
    fn test_no_participants() {
        assert!(matches!(
            split_evenly(Money::new(10.0), Vec::new()),
            Err(LedgerError::Validation(_))
        ));
    }
}
