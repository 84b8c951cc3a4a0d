use std::sync::Arc;

use bank_index::AccountIndex;
use bank_store::StateStore;
use tracing::{debug, info};

use crate::account::{parse_amount, Account, BalanceChange};
use crate::error::{LedgerError, LedgerResult};
use crate::locks::KeyLocks;

/// Tuning knobs for an [`AccountLedger`].
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Sentinel key holding the account index.
    pub index_key: String,
    /// Serialize read-modify-write sequences per key. When `false` the
    /// ledger reproduces the unsynchronized behavior of a bare get/put host,
    /// including lost updates under concurrent deposits.
    pub serialize_writes: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            index_key: bank_index::DEFAULT_INDEX_KEY.to_string(),
            serialize_writes: true,
        }
    }
}

/// One account record as read during a full scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRecord {
    /// Identifier the record was read from.
    pub id: String,
    /// Stored bytes, uninterpreted.
    pub bytes: Vec<u8>,
}

/// Account ledger over an external state store.
///
/// Holds no account state of its own; every call reads from and writes to
/// the store. The only in-process state is the optional key lock table.
pub struct AccountLedger {
    store: Arc<dyn StateStore>,
    index: AccountIndex,
    locks: Option<KeyLocks>,
}

impl AccountLedger {
    pub fn new(store: Arc<dyn StateStore>, config: LedgerConfig) -> Self {
        Self {
            store,
            index: AccountIndex::new(config.index_key),
            locks: config.serialize_writes.then(KeyLocks::new),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// The index handle this ledger maintains.
    pub fn index(&self) -> &AccountIndex {
        &self.index
    }

    /// Reset the account index to the empty sequence.
    ///
    /// Account records already in the store are left in place but no longer
    /// enumerated.
    pub fn init(&self) -> LedgerResult<()> {
        self.locked(self.index.key(), || self.index.reset(self.store.as_ref()))?;
        info!(index_key = %self.index.key(), "ledger initialized");
        Ok(())
    }

    /// Create (or overwrite) the account `id` and append it to the index.
    ///
    /// `balance` must be a base-10 integer. The account write and the index
    /// append are two separate store writes; a failure between them leaves
    /// the account stored but not indexed.
    pub fn create(&self, id: &str, balance: &str, name: &str) -> LedgerResult<Account> {
        self.ensure_not_reserved(id)?;
        let account = Account::new(id, parse_amount(balance)?, name);
        let encoded = account.encode()?;

        self.locked(id, || self.store.put(id, &encoded))?;
        self.locked(self.index.key(), || self.index.append(self.store.as_ref(), id))?;

        info!(id, balance = account.balance, "account created");
        Ok(account)
    }

    /// Raw stored bytes for `id`.
    pub fn read(&self, id: &str) -> LedgerResult<Vec<u8>> {
        self.store
            .get(id)?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    /// Decoded account for `id`.
    pub fn account(&self, id: &str) -> LedgerResult<Account> {
        let raw = self.read(id)?;
        Account::decode(id, &raw)
    }

    /// Parse `delta` and apply it to the balance of `id`.
    pub fn adjust_balance(
        &self,
        id: &str,
        delta: &str,
        change: BalanceChange,
    ) -> LedgerResult<Account> {
        self.ensure_not_reserved(id)?;
        self.locked(id, || {
            let current = self.load_for_update(id)?;
            let delta = parse_amount(delta)?;
            self.write_balance(current, delta, change)
        })
    }

    pub fn deposit(&self, id: &str, amount: &str) -> LedgerResult<Account> {
        self.adjust_balance(id, amount, BalanceChange::Deposit)
    }

    pub fn withdraw(&self, id: &str, amount: &str) -> LedgerResult<Account> {
        self.adjust_balance(id, amount, BalanceChange::Withdrawal)
    }

    /// Read every indexed record in index order.
    ///
    /// Fails on the first record that cannot be read; no partial result is
    /// returned. Duplicate index entries yield the record once per entry.
    pub fn enumerate_all(&self) -> LedgerResult<Vec<RawRecord>> {
        let ids = self.index.enumerate(self.store.as_ref())?;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let bytes = self.read(&id)?;
            records.push(RawRecord { id, bytes });
        }
        debug!(count = records.len(), "full scan complete");
        Ok(records)
    }

    /// Every indexed account, decoded.
    pub fn accounts(&self) -> LedgerResult<Vec<Account>> {
        self.enumerate_all()?
            .iter()
            .map(|r| Account::decode(&r.id, &r.bytes))
            .collect()
    }

    // A missing record is reported as malformed: the update path cannot tell
    // "never created" apart from "stored but unreadable".
    fn load_for_update(&self, id: &str) -> LedgerResult<Account> {
        match self.store.get(id)? {
            Some(raw) => Account::decode(id, &raw),
            None => Err(LedgerError::MalformedAccount {
                id: id.to_string(),
                reason: "no record stored".to_string(),
            }),
        }
    }

    fn write_balance(
        &self,
        mut account: Account,
        delta: i64,
        change: BalanceChange,
    ) -> LedgerResult<Account> {
        let before = account.balance;
        account.balance = change.apply(before, delta)?;
        self.store.put(&account.id, &account.encode()?)?;
        debug!(
            id = %account.id,
            %change,
            delta,
            before,
            after = account.balance,
            "balance adjusted"
        );
        Ok(account)
    }

    /// Reject `key` if it is the index sentinel.
    pub fn ensure_not_reserved(&self, key: &str) -> LedgerResult<()> {
        if key == self.index.key() {
            return Err(LedgerError::ReservedKey(key.to_string()));
        }
        Ok(())
    }

    fn locked<T>(&self, key: &str, f: impl FnOnce() -> T) -> T {
        match &self.locks {
            Some(locks) => locks.with_lock(key, f),
            None => f(),
        }
    }
}

impl std::fmt::Debug for AccountLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountLedger")
            .field("index_key", &self.index.key())
            .field("serialize_writes", &self.locks.is_some())
            .finish()
    }
}
