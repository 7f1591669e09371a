//! Group model
//!
//! A named set of accounts that share expenses evenly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, GroupId};

/// A group of accounts that split expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,

    pub name: String,

    /// Member accounts in insertion order. Duplicates are kept as-is.
    pub members: Vec<AccountId>,

    pub created_by: AccountId,

    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(
        name: impl Into<String>,
        created_by: AccountId,
        members: Vec<AccountId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            members,
            created_by,
            created_at: now,
        }
    }

    pub fn is_member(&self, account: AccountId) -> bool {
        self.members.contains(&account)
    }

    /// Validate the group
    pub fn validate(&self) -> Result<(), GroupValidationError> {
        if self.name.trim().is_empty() {
            return Err(GroupValidationError::EmptyName);
        }
        if self.members.is_empty() {
            return Err(GroupValidationError::NoMembers);
        }
        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} members)", self.name, self.members.len())
    }
}

/// Validation errors for groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    EmptyName,
    NoMembers,
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Group name cannot be empty"),
            Self::NoMembers => write!(f, "A group needs at least one member"),
        }
    }
}

impl std::error::Error for GroupValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let creator = AccountId::new();
        let group = Group::new("Flat 3B", creator, vec![creator], Utc::now());
        assert!(group.validate().is_ok());
        assert!(group.is_member(creator));

        let empty = Group::new("Flat 3B", creator, Vec::new(), Utc::now());
        assert_eq!(empty.validate(), Err(GroupValidationError::NoMembers));
    }
}
