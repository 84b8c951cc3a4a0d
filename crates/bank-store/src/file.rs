//! JSON-file backed state store.
//!
//! [`FileStateStore`] keeps the whole key space in memory and rewrites the
//! backing file on every `put`. The file is a single JSON object mapping keys
//! to hex-encoded values:
//!
//! ```text
//! {
//!   "A1": "7b2262616e6b5f4944223a...",
//!   "index": "5b224131225d"
//! }
//! ```
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so a crash mid-write leaves the previous state intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::StateStore;

/// State store persisted to a single JSON file.
pub struct FileStateStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl FileStateStore {
    /// Open the state file at `path`, creating an empty store if it does not
    /// exist yet. The file itself is only created on the first `put`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let raw = fs::read(&path)?;
            decode(&raw)?
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = values.len(), "state file opened");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, values: &BTreeMap<String, Vec<u8>>) -> StoreResult<()> {
        let encoded: BTreeMap<&str, String> = values
            .iter()
            .map(|(k, v)| (k.as_str(), hex::encode(v)))
            .collect();
        let body = serde_json::to_vec_pretty(&encoded)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&body)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

fn decode(raw: &[u8]) -> StoreResult<BTreeMap<String, Vec<u8>>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeMap::new());
    }
    let encoded: BTreeMap<String, String> =
        serde_json::from_slice(raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    encoded
        .into_iter()
        .map(|(k, v)| {
            let bytes = hex::decode(&v)
                .map_err(|e| StoreError::Corrupt(format!("value for {k}: {e}")))?;
            Ok((k, bytes))
        })
        .collect()
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self
            .values
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let mut map = self
            .values
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        let previous = map.insert(key.to_string(), value.to_vec());

        // Roll back the in-memory view if the file could not be rewritten.
        if let Err(e) = self.persist(&map) {
            match previous {
                Some(old) => map.insert(key.to_string(), old),
                None => map.remove(key),
            };
            return Err(e);
        }

        debug!(key, len = value.len(), "state persisted");
        Ok(())
    }
}

impl std::fmt::Debug for FileStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStateStore")
            .field("path", &self.path)
            .field("key_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::open(dir.path().join("state.json")).unwrap();
        assert!(store.is_empty());
        assert!(store.get("anything").unwrap().is_none());
        // Nothing is written until the first put.
        assert!(!store.path().exists());
    }

    #[test]
    fn put_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        {
            let store = FileStateStore::open(&path).unwrap();
            store.put("A1", br#"{"bank_ID":"A1"}"#).unwrap();
            store.put("index", br#"["A1"]"#).unwrap();
        }

        let reopened = FileStateStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(
            reopened.get("A1").unwrap(),
            Some(br#"{"bank_ID":"A1"}"#.to_vec())
        );
        assert_eq!(reopened.get("index").unwrap(), Some(br#"["A1"]"#.to_vec()));
    }

    #[test]
    fn file_is_hex_encoded_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = FileStateStore::open(&path).unwrap();
        store.put("k", b"hi").unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.get("k").map(String::as_str), Some("6869"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("state.json");
        let store = FileStateStore::open(&path).unwrap();
        store.put("k", b"v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"not json").unwrap();
        let err = FileStateStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn bad_hex_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, br#"{"k": "zz"}"#).unwrap();
        let err = FileStateStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"  \n").unwrap();
        let store = FileStateStore::open(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn empty_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::open(dir.path().join("state.json")).unwrap();
        assert!(matches!(store.put("", b"v"), Err(StoreError::EmptyKey)));
    }
}
