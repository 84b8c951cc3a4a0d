/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("account not found: {0}")]
    NotFound(String),

    #[error("malformed account record for {id}: {reason}")]
    MalformedAccount { id: String, reason: String },

    #[error("invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("key {0} is reserved for the account index")]
    ReservedKey(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("index error: {0}")]
    Index(#[from] bank_index::IndexError),

    #[error("store error: {0}")]
    Store(#[from] bank_store::StoreError),
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
