//! Account ledger for the chain bank core.
//!
//! This crate provides:
//! - The [`Account`] record and its stored JSON form
//! - [`AccountLedger`]: create, read, deposit/withdraw, and full scans over a
//!   [`StateStore`](bank_store::StateStore), keeping the account index in step
//! - [`KeyLocks`] for serializing read-modify-write sequences per key

pub mod account;
pub mod error;
pub mod ledger;
pub mod locks;

pub use account::{parse_amount, Account, BalanceChange};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{AccountLedger, LedgerConfig, RawRecord};
pub use locks::KeyLocks;
