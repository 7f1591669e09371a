//! Allocation intent repository for JSON storage

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::LedgerResult;
use crate::models::{AllocationIntent, IntentId};

use super::collection::{JsonCollection, Keyed};
use super::traits::IntentStore;

impl Keyed for AllocationIntent {
    type Key = IntentId;

    fn key(&self) -> IntentId {
        self.id
    }
}

/// Repository for intent persistence
pub struct IntentRepository {
    records: JsonCollection<AllocationIntent>,
}

impl IntentRepository {
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
impl IntentStore for IntentRepository {
    async fn put(&self, intent: AllocationIntent) -> LedgerResult<()> {
        self.records.mutate(|data| {
            data.insert(intent.id, intent);
            Ok(())
        })
    }

    async fn get(&self, id: IntentId) -> LedgerResult<Option<AllocationIntent>> {
        self.records.get(id)
    }

    async fn list_incomplete(&self) -> LedgerResult<Vec<AllocationIntent>> {
        let mut intents: Vec<_> = self
            .records
            .values()?
            .into_iter()
            .filter(|i| !i.is_complete())
            .collect();
        intents.sort_by_key(|i| i.created_at);
        Ok(intents)
    }

    async fn remove(&self, id: IntentId) -> LedgerResult<()> {
        if self.records.get(id)?.is_none() {
            return Ok(());
        }
        self.records.mutate(|data| {
            data.remove(&id);
            Ok(())
        })
    }
}
