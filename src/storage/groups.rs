//! Group repository for JSON storage

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Group, GroupId};

use super::collection::{JsonCollection, Keyed};
use super::traits::GroupStore;

impl Keyed for Group {
    type Key = GroupId;

    fn key(&self) -> GroupId {
        self.id
    }
}

/// Repository for group persistence
pub struct GroupRepository {
    records: JsonCollection<Group>,
}

impl GroupRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            records: JsonCollection::new(path),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        self.records.load()
    }
}

#[async_trait]
impl GroupStore for GroupRepository {
    async fn get(&self, id: GroupId) -> LedgerResult<Option<Group>> {
        self.records.get(id)
    }

    async fn insert(&self, group: Group) -> LedgerResult<()> {
        self.records.mutate(|data| {
            if data.contains_key(&group.id) {
                return Err(LedgerError::Duplicate {
                    entity_type: "Group",
                    identifier: group.id.to_string(),
                });
            }
            data.insert(group.id, group);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountId;
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_member_order_survives_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("groups.json");
        let repo = GroupRepository::new(path.clone());
        repo.load().unwrap();

        let a = AccountId::new();
        let b = AccountId::new();
        let group = Group::new("Trip", a, vec![b, a, b], Utc::now());
        let id = group.id;
        repo.insert(group).await.unwrap();

        let reopened = GroupRepository::new(path);
        reopened.load().unwrap();
        let loaded = reopened.get(id).await.unwrap().unwrap();
        assert_eq!(loaded.members, vec![b, a, b]);
    }
}
