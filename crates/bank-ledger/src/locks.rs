//! Per-key mutual exclusion for read-modify-write sequences.
//!
//! The store only offers `get` and `put`, so a deposit is a read followed by
//! a write. Two deposits racing on one key can both read the old balance and
//! one update is lost. [`KeyLocks`] hands out one mutex per key so callers
//! sharing a ledger run those sequences one at a time. It does nothing for
//! separate processes writing the same store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Table of lazily created per-key mutexes.
///
/// An entry lives only while some caller holds or waits on its lock, so the
/// table size is bounded by the number of in-flight callers, not by the
/// number of distinct keys ever touched.
#[derive(Debug, Default)]
pub struct KeyLocks {
    table: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `key`.
    ///
    /// The guarded data is `()`, so a poisoned lock carries no broken state
    /// and is recovered rather than propagated.
    pub fn with_lock<T>(&self, key: &str, f: impl FnOnce() -> T) -> T {
        let slot = {
            let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(table.entry(key.to_string()).or_default())
        };
        let out = {
            let _guard = slot.lock().unwrap_or_else(|e| e.into_inner());
            f()
        };
        self.release(key, &slot);
        out
    }

    // Waiters clone the slot under the table lock, so a count of two (table
    // plus this caller) means nobody else is queued on the key.
    fn release(&self, key: &str, slot: &Arc<Mutex<()>>) {
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        if Arc::strong_count(slot) == 2 {
            table.remove(key);
        }
    }

    /// Number of keys currently held or waited on.
    pub fn len(&self) -> usize {
        self.table.lock().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn returns_closure_value() {
        let locks = KeyLocks::new();
        assert_eq!(locks.with_lock("a", || 42), 42);
        assert!(locks.is_empty());
    }

    #[test]
    fn same_key_is_exclusive() {
        let locks = Arc::new(KeyLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_seen = Arc::clone(&max_seen);
                thread::spawn(move || {
                    for _ in 0..50 {
                        locks.with_lock("shared", || {
                            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_seen.fetch_max(now, Ordering::SeqCst);
                            thread::yield_now();
                            inside.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distinct_keys_do_not_block() {
        let locks = KeyLocks::new();
        // Nested acquisition of different keys must not deadlock.
        let v = locks.with_lock("a", || locks.with_lock("b", || locks.len()));
        assert_eq!(v, 2);
        assert!(locks.is_empty());
    }

    #[test]
    fn released_keys_leave_the_table() {
        let locks = KeyLocks::new();
        for i in 0..1000 {
            locks.with_lock(&format!("k{i}"), || ());
        }
        assert!(locks.is_empty());
    }

    #[test]
    fn contended_key_is_released_by_last_holder() {
        let locks = Arc::new(KeyLocks::new());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                thread::spawn(move || {
                    for _ in 0..50 {
                        locks.with_lock("shared", thread::yield_now);
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert!(locks.is_empty());
    }
}
