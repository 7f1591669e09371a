//! In-memory keyed collection backed by a JSON file
//!
//! Every mutation is applied to a copy, written to disk, and only then
//! swapped in, so memory never runs ahead of the file. The file holds one
//! JSON array of records ordered by key. It is replaced through a uniquely
//! named sibling temp file, so a crash leaves either the old or the new
//! array on disk.

use std::collections::HashMap;
use std::fs;
use std::hash::Hash;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::{LedgerError, LedgerResult};

/// A record that can live in a [`JsonCollection`]
pub trait Keyed: Clone + Serialize + DeserializeOwned {
    type Key: Copy + Eq + Hash + Ord;

    fn key(&self) -> Self::Key;
}

pub struct JsonCollection<V: Keyed> {
    path: PathBuf,
    data: RwLock<HashMap<V::Key, V>>,
}

impl<V: Keyed> JsonCollection<V> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load records from disk, replacing anything in memory
    pub fn load(&self) -> LedgerResult<()> {
        let records = self.read_records()?;

        let mut data = self.data.write().map_err(|e| {
            LedgerError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for record in records {
            data.insert(record.key(), record);
        }

        Ok(())
    }

    pub fn get(&self, key: V::Key) -> LedgerResult<Option<V>> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&key).cloned())
    }

    pub fn values(&self) -> LedgerResult<Vec<V>> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().cloned().collect())
    }

    pub fn keys(&self) -> LedgerResult<Vec<V::Key>> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.keys().copied().collect())
    }

    pub fn count(&self) -> LedgerResult<usize> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }

    /// Apply `change` under the write lock and persist the result
    ///
    /// If `change` or the disk write fails, the collection is left untouched.
    pub fn mutate<R>(
        &self,
        change: impl FnOnce(&mut HashMap<V::Key, V>) -> LedgerResult<R>,
    ) -> LedgerResult<R> {
        let mut data = self.data.write().map_err(|e| {
            LedgerError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let mut next = data.clone();
        let result = change(&mut next)?;

        self.persist(&next)?;

        *data = next;
        Ok(result)
    }

    fn read_records(&self) -> LedgerResult<Vec<V>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.file_error("read", e)),
        };

        serde_json::from_slice(&bytes).map_err(|e| self.file_error("parse", e))
    }

    fn persist(&self, records: &HashMap<V::Key, V>) -> LedgerResult<()> {
        let mut ordered: Vec<&V> = records.values().collect();
        ordered.sort_by_key(|record| record.key());
        let bytes = serde_json::to_vec_pretty(&ordered).map_err(|e| self.file_error("encode", e))?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| self.file_error("create the directory of", e))?;

        let mut staged = NamedTempFile::new_in(dir).map_err(|e| self.file_error("stage", e))?;
        staged
            .write_all(&bytes)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| self.file_error("write", e))?;
        staged
            .persist(&self.path)
            .map_err(|e| self.file_error("replace", e.error))?;

        Ok(())
    }

    fn file_error(&self, action: &str, err: impl std::fmt::Display) -> LedgerError {
        LedgerError::Storage(format!("Failed to {} {}: {}", action, self.path.display(), err))
    }
}
