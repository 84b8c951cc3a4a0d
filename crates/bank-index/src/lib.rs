//! Account index for the chain bank ledger core.
//!
//! The index is the ordered list of every account identifier ever created.
//! It lives in the state store as a single JSON array under a reserved key
//! and is what makes full-store enumeration possible without a key scan.
//!
//! # Key Types
//!
//! - [`AccountIndex`] -- append / enumerate / reset over a [`StateStore`]
//!
//! [`StateStore`]: bank_store::StateStore

pub mod error;
pub mod index;

pub use error::{IndexError, IndexResult};
pub use index::{AccountIndex, DEFAULT_INDEX_KEY};
