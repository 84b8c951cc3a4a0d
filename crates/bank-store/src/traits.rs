use std::sync::Arc;

use crate::error::StoreResult;

/// Key-value state store owned by the hosting platform.
///
/// The ledger core treats the store as durable and consistent: a `put` that
/// returned `Ok` is visible to every later `get`. Implementations must be
/// thread-safe because the diagnostic probe writes from a spawned task.
///
/// The store never interprets values; they are opaque bytes.
pub trait StateStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing has been written under the key.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write (create or overwrite) the value stored under `key`.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Check whether a value exists under `key`.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        (**self).contains(key)
    }
}
