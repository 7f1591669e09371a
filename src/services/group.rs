//! Group directory
//!
//! Groups are created once with a fixed member list. Each member's account
//! also records the group it belongs to.

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Change, Ledger};
use crate::models::{AccountId, Group, GroupId};

pub struct GroupDirectory<'a> {
    ledger: &'a Ledger,
}

impl<'a> GroupDirectory<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Create a group
    ///
    /// The creator is added as the first member if not listed. Every member
    /// must be an existing account.
    pub async fn create(
        &self,
        name: &str,
        creator: AccountId,
        members: Vec<AccountId>,
    ) -> LedgerResult<Group> {
        let mut members = members;
        if !members.contains(&creator) {
            members.insert(0, creator);
        }

        let group = Group::new(name.trim(), creator, members, self.ledger.now());
        group
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        for member in &group.members {
            if self.ledger.stores.accounts.get(*member).await?.is_none() {
                return Err(LedgerError::account_not_found(member));
            }
        }

        self.ledger.stores.groups.insert(group.clone()).await?;

        let mut linked: Vec<AccountId> = Vec::new();
        for member in &group.members {
            if linked.contains(member) {
                continue;
            }
            linked.push(*member);

            let group_id = group.id;
            self.ledger
                .modify_account(*member, |account| {
                    if account.groups.contains(&group_id) {
                        Ok(Change::Skip(()))
                    } else {
                        account.groups.push(group_id);
                        Ok(Change::Write(()))
                    }
                })
                .await?;
        }

        tracing::info!(group = %group.id, name = %group.name, members = group.members.len(), "Created group");
        Ok(group)
    }

    pub async fn get(&self, id: GroupId) -> LedgerResult<Group> {
        self.ledger
            .stores
            .groups
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::group_not_found(id))
    }
}
