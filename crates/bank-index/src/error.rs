//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The stored index record is not a sequence of strings.
    #[error("malformed index record under {key}: {reason}")]
    Malformed { key: String, reason: String },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] bank_store::StoreError),

    /// Serialization error while encoding the index.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
