use thiserror::Error;

/// Failures raised by key-value backends and the document stores layered on them.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage is not available in this context")]
    Unavailable,
    #[error("Storage quota exceeded while writing `{key}` ({size} bytes, limit {limit})")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Malformed document under `{key}`: {reason}")]
    Malformed { key: String, reason: String },
}

pub type StoreResult<T> = std::result::Result<T, StorageError>;

/// Outcome of a read-modify-write against a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    NotFound,
    /// An entity with the same id already exists; nothing was written.
    Duplicate,
    /// The change would store an amount that is negative or not finite; nothing was written.
    Rejected,
}

impl Mutation {
    pub fn applied(self) -> bool {
        matches!(self, Mutation::Applied)
    }
}

/// Failures that stop the command shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
