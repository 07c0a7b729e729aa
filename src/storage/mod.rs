//! Key-value persistence: the backends and the typed JSON documents stored in them.

pub mod document;
pub mod json_backend;
pub mod memory;

use crate::errors::StoreResult;

/// Key holding the finance document.
pub const FINANCE_STORAGE_KEY: &str = "secretstash_finance_data";
/// Key holding the snippet collection.
pub const SNIPPETS_STORAGE_KEY: &str = "secretstash_snippets";
/// Key holding the secret collection.
pub const SECRETS_STORAGE_KEY: &str = "secretstash_secrets";

/// String-keyed storage holding one serialized document per key.
///
/// Writes replace the whole value. There is no cross-key transaction and no
/// locking across handles: concurrent writers can clobber each other.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&self, key: &str) -> StoreResult<()>;

    /// Whether this backend can persist anything at all.
    fn is_available(&self) -> bool {
        true
    }
}

pub use document::{FinanceStore, JsonDocument, SecretStore, SnippetStore};
pub use json_backend::FileStorage;
pub use memory::{DetachedStorage, MemoryStorage};
