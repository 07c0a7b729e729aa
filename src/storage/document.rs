use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::{
    core::time::Clock,
    domain::{FinanceData, Secret, Snippet},
    errors::{StorageError, StoreResult},
};

use super::{KeyValueStorage, FINANCE_STORAGE_KEY, SECRETS_STORAGE_KEY, SNIPPETS_STORAGE_KEY};

/// A typed JSON document stored under one fixed key.
pub struct JsonDocument<T> {
    storage: Arc<dyn KeyValueStorage>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonDocument<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: &'static str) -> Self {
        Self {
            storage,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_available()
    }

    /// Loads the document, `Ok(None)` when nothing is stored under the key.
    pub fn try_load(&self) -> StoreResult<Option<T>> {
        self.try_load_with(|_| false)
    }

    /// Loads the document after letting `prepare` rewrite the raw JSON value.
    pub fn try_load_with<F>(&self, prepare: F) -> StoreResult<Option<T>>
    where
        F: FnOnce(&mut Value) -> bool,
    {
        let Some(raw) = self.storage.get_item(self.key)? else {
            return Ok(None);
        };
        let mut value: Value = serde_json::from_str(&raw)?;
        if prepare(&mut value) {
            debug!(key = self.key, "normalized legacy document shape");
        }
        let document = serde_json::from_value(value).map_err(|err| StorageError::Malformed {
            key: self.key.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Some(document))
    }

    /// Serializes and overwrites the stored document.
    pub fn try_save(&self, document: &T) -> StoreResult<()> {
        let json = serde_json::to_string(document)?;
        self.storage.set_item(self.key, &json)
    }

    pub fn try_clear(&self) -> StoreResult<()> {
        self.storage.remove_item(self.key)
    }
}

/// Logs a failed write and swallows it. Unavailable storage is skipped quietly.
pub(crate) fn report_write_failure(key: &str, err: StorageError) {
    match err {
        StorageError::Unavailable => debug!(key, "storage unavailable; write skipped"),
        other => error!(key, error = %other, "failed to persist document"),
    }
}

/// Persistent store for the finance document.
///
/// `read` never fails: a missing, corrupt or unreachable document yields the
/// seeded default. `write` never fails either; failures are logged. The
/// `try_*` variants expose the underlying result.
#[derive(Clone)]
pub struct FinanceStore {
    document: JsonDocument<FinanceData>,
    clock: Arc<dyn Clock>,
}

impl FinanceStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            document: JsonDocument::new(storage, FINANCE_STORAGE_KEY),
            clock,
        }
    }

    pub fn try_read(&self) -> StoreResult<Option<FinanceData>> {
        self.document.try_load_with(FinanceData::normalize_legacy)
    }

    pub fn read(&self) -> FinanceData {
        match self.try_read() {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!("no finance document stored; using seeded defaults");
                FinanceData::seeded(self.clock.now())
            }
            Err(StorageError::Unavailable) => FinanceData::seeded(self.clock.now()),
            Err(err) => {
                warn!(error = %err, "unreadable finance document; using seeded defaults");
                FinanceData::seeded(self.clock.now())
            }
        }
    }

    pub fn try_write(&self, data: &FinanceData) -> StoreResult<()> {
        self.document.try_save(data)
    }

    pub fn write(&self, data: &FinanceData) {
        if let Err(err) = self.try_write(data) {
            report_write_failure(self.document.key(), err);
        }
    }

    /// Removes the stored document so the next read falls back to the defaults.
    pub fn clear(&self) {
        if let Err(err) = self.document.try_clear() {
            report_write_failure(self.document.key(), err);
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn key(&self) -> &'static str {
        self.document.key()
    }
}

/// Persistent store for the snippet collection.
///
/// The first read against empty storage writes the sample snippets.
#[derive(Clone)]
pub struct SnippetStore {
    document: JsonDocument<Vec<Snippet>>,
}

impl SnippetStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            document: JsonDocument::new(storage, SNIPPETS_STORAGE_KEY),
        }
    }

    pub fn key(&self) -> &'static str {
        self.document.key()
    }

    pub fn try_read(&self) -> StoreResult<Option<Vec<Snippet>>> {
        self.document.try_load()
    }

    pub fn read(&self) -> Vec<Snippet> {
        match self.try_read() {
            Ok(Some(snippets)) => snippets,
            Ok(None) => {
                let samples = Snippet::samples();
                self.write(&samples);
                samples
            }
            Err(StorageError::Unavailable) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "unreadable snippet collection");
                Vec::new()
            }
        }
    }

    pub fn try_write(&self, snippets: &[Snippet]) -> StoreResult<()> {
        let owned = snippets.to_vec();
        self.document.try_save(&owned)
    }

    pub fn write(&self, snippets: &[Snippet]) {
        if let Err(err) = self.try_write(snippets) {
            report_write_failure(self.document.key(), err);
        }
    }
}

/// Persistent store for the secret collection.
///
/// Like the snippet store, the first read against empty storage writes the samples.
#[derive(Clone)]
pub struct SecretStore {
    document: JsonDocument<Vec<Secret>>,
}

impl SecretStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            document: JsonDocument::new(storage, SECRETS_STORAGE_KEY),
        }
    }

    pub fn key(&self) -> &'static str {
        self.document.key()
    }

    pub fn try_read(&self) -> StoreResult<Option<Vec<Secret>>> {
        self.document.try_load()
    }

    pub fn read(&self) -> Vec<Secret> {
        match self.try_read() {
            Ok(Some(secrets)) => secrets,
            Ok(None) => {
                let samples = Secret::samples();
                self.write(&samples);
                samples
            }
            Err(StorageError::Unavailable) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "unreadable secret collection");
                Vec::new()
            }
        }
    }

    pub fn try_write(&self, secrets: &[Secret]) -> StoreResult<()> {
        let owned = secrets.to_vec();
        self.document.try_save(&owned)
    }

    pub fn write(&self, secrets: &[Secret]) {
        if let Err(err) = self.try_write(secrets) {
            report_write_failure(self.document.key(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;
    use crate::storage::{DetachedStorage, MemoryStorage};
    use chrono::{TimeZone, Utc};

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn legacy_document_without_history_is_normalized() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(
                FINANCE_STORAGE_KEY,
                r#"{"incomeStreams":[],"expenseFlows":[],"accounts":[],"historicalData":"bogus"}"#,
            )
            .unwrap();
        let store = FinanceStore::new(storage, clock());
        let data = store.try_read().unwrap().expect("document present");
        assert!(data.historical_data.is_empty());
        assert!(data.income_streams.is_empty());
    }

    #[test]
    fn corrupt_document_falls_back_without_touching_stored_bytes() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(FINANCE_STORAGE_KEY, "{not json").unwrap();
        let store = FinanceStore::new(storage.clone(), clock());

        assert!(store.try_read().is_err());
        let data = store.read();
        assert_eq!(data.accounts.len(), 2);
        assert_eq!(
            storage.get_item(FINANCE_STORAGE_KEY).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn write_to_detached_storage_is_swallowed() {
        let store = FinanceStore::new(Arc::new(DetachedStorage), clock());
        let data = store.read();
        store.write(&data);
        assert!(matches!(
            store.try_write(&data),
            Err(StorageError::Unavailable)
        ));
    }

    #[test]
    fn secrets_and_snippets_seed_samples_on_first_read() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        assert_eq!(SecretStore::new(storage.clone()).read(), Secret::samples());
        assert!(storage.get_item(SECRETS_STORAGE_KEY).unwrap().is_some());

        let cleared = SecretStore::new(storage.clone());
        cleared.write(&[]);
        assert!(cleared.read().is_empty());

        let snippets = SnippetStore::new(storage.clone());
        let first = snippets.read();
        assert_eq!(first, Snippet::samples());
        assert!(storage.get_item(SNIPPETS_STORAGE_KEY).unwrap().is_some());
    }
}
