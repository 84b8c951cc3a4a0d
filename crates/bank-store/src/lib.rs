//! Key-value state store boundary for the chain bank ledger core.
//!
//! The ledger core never owns durable storage. Every handler reads and writes
//! through the [`StateStore`] trait, which stands in for the state database of
//! the hosting platform.
//!
//! # Storage Backends
//!
//! - [`InMemoryStateStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileStateStore`] -- single JSON file, used by the `bank` command-line tool
//!
//! # Design Rules
//!
//! 1. Values are opaque bytes; the store never interprets them.
//! 2. A missing key is `Ok(None)`, never an error.
//! 3. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileStateStore;
pub use memory::InMemoryStateStore;
pub use traits::StateStore;
