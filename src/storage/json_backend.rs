use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    core::utils::PathResolver,
    errors::StoreResult,
    utils::persistence::{ensure_dir, write_atomic},
};

use super::KeyValueStorage;

const DOCUMENT_EXTENSION: &str = "json";

/// File-backed storage: each key maps to `<root>/<key>.json`, replaced atomically.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    /// Storage rooted at the resolved application data directory.
    pub fn new_default() -> StoreResult<Self> {
        Self::new(PathResolver::data_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), DOCUMENT_EXTENSION))
    }

    /// Keys that currently have a stored document.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(data))
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.document_path(key);
        write_atomic(&path, value)?;
        debug!(key, path = %path.display(), bytes = value.len(), "document written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        let path = self.document_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "document".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FINANCE_STORAGE_KEY;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (FileStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = FileStorage::new(temp.path().join("data")).expect("file storage");
        (storage, temp)
    }

    #[test]
    fn set_and_get_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.set_item(FINANCE_STORAGE_KEY, "{}").expect("write");
        assert_eq!(
            storage.get_item(FINANCE_STORAGE_KEY).unwrap().as_deref(),
            Some("{}")
        );
        assert!(storage.document_path(FINANCE_STORAGE_KEY).exists());
        assert_eq!(storage.keys().unwrap(), vec![FINANCE_STORAGE_KEY.to_string()]);
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.get_item("absent").unwrap().is_none());
        storage.remove_item("absent").expect("removing a missing key is fine");
    }

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let (storage, _guard) = storage_with_temp_dir();
        let path = storage.document_path("../Weird Key!");
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("___weird_key_.json")
        );
        assert!(path.starts_with(storage.root()));
    }
}
