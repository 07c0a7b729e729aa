use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use crate::errors::{StorageError, StoreResult};

use super::KeyValueStorage;

/// Process-local storage, optionally bounded by a byte quota across all keys.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes pushing the total stored bytes past `limit`.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: Some(limit),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.lock();
        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();
            let size = others + key.len() + value.len();
            if size > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    limit,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Backend for contexts without persistent storage. Every call fails with
/// [`StorageError::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedStorage;

impl KeyValueStorage for DetachedStorage {
    fn get_item(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StorageError::Unavailable)
    }

    fn remove_item(&self, _key: &str) -> StoreResult<()> {
        Err(StorageError::Unavailable)
    }

    fn is_available(&self) -> bool {
        false
    }
}
