//! The [`AccountIndex`] record and its append-only maintenance.
//!
//! On-store format is a JSON array of identifiers in creation order:
//!
//! ```text
//! ["A1","B7","A1"]
//! ```
//!
//! Duplicates are kept. A JSON `null`, a zero-length value, and a missing key
//! all read as the empty sequence.
//!
//! `append` is a read-modify-write against the store and is not atomic with
//! the account write that precedes it. A crash in between leaves an account
//! record with no index entry. Callers that share one store across threads
//! must serialize `append` themselves; `bank-ledger` does this with its key
//! lock table.

use bank_store::StateStore;
use tracing::{debug, warn};

use crate::error::{IndexError, IndexResult};

/// Reserved key under which the index record is stored by default.
pub const DEFAULT_INDEX_KEY: &str = "index";

/// Handle to the index record stored under a configurable sentinel key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountIndex {
    key: String,
}

impl AccountIndex {
    /// Create a handle for the index stored under `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The sentinel key holding the index record.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrite the index record with an empty sequence.
    pub fn reset(&self, store: &dyn StateStore) -> IndexResult<()> {
        self.write(store, &[])?;
        debug!(key = %self.key, "index reset");
        Ok(())
    }

    /// Append `identifier` to the index.
    ///
    /// A missing or unreadable record is treated as empty and replaced, so a
    /// corrupt index heals on the next append at the cost of its old entries.
    pub fn append(&self, store: &dyn StateStore, identifier: &str) -> IndexResult<()> {
        let mut ids = match self.enumerate(store) {
            Ok(ids) => ids,
            Err(IndexError::Malformed { reason, .. }) => {
                warn!(key = %self.key, %reason, "discarding malformed index record");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        ids.push(identifier.to_string());
        self.write(store, &ids)?;
        debug!(key = %self.key, identifier, len = ids.len(), "index appended");
        Ok(())
    }

    /// Read the full ordered list of identifiers.
    pub fn enumerate(&self, store: &dyn StateStore) -> IndexResult<Vec<String>> {
        match store.get(&self.key)? {
            Some(raw) => self.decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn decode(&self, raw: &[u8]) -> IndexResult<Vec<String>> {
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Option<Vec<String>> =
            serde_json::from_slice(raw).map_err(|e| IndexError::Malformed {
                key: self.key.clone(),
                reason: e.to_string(),
            })?;
        Ok(ids.unwrap_or_default())
    }

    fn write(&self, store: &dyn StateStore, ids: &[String]) -> IndexResult<()> {
        let encoded =
            serde_json::to_vec(ids).map_err(|e| IndexError::Serialization(e.to_string()))?;
        store.put(&self.key, &encoded)?;
        Ok(())
    }
}

impl Default for AccountIndex {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_KEY)
    }
}
