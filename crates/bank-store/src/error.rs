/// Errors from state store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend refused or failed the operation.
    #[error("backend error on key {key}: {reason}")]
    Backend { key: String, reason: String },

    /// Keys must be non-empty.
    #[error("cannot store a value under an empty key")]
    EmptyKey,

    /// The on-disk state file could not be decoded.
    #[error("corrupt state file: {0}")]
    Corrupt(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
