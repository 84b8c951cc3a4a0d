//! The persisted account record and its amount parsing rules.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// One account as stored under its identifier.
///
/// Field names on the wire are fixed by existing consumers:
/// `{"bank_ID":"A1","balance":100,"name":"Alice"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "bank_ID")]
    pub id: String,
    pub balance: i64,
    pub name: String,
}

impl Account {
    pub fn new(id: impl Into<String>, balance: i64, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance,
            name: name.into(),
        }
    }

    /// Encode to the stored JSON form.
    pub fn encode(&self) -> LedgerResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Decode a stored record. `id` is the key the bytes were read from and
    /// only labels the error.
    pub fn decode(id: &str, raw: &[u8]) -> LedgerResult<Self> {
        serde_json::from_slice(raw).map_err(|e| LedgerError::MalformedAccount {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Sign applied to a balance delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceChange {
    Deposit,
    Withdrawal,
}

impl BalanceChange {
    /// Apply `delta` to `balance`. There is no lower bound: withdrawals may
    /// take the balance negative. Only 64-bit overflow is rejected.
    pub fn apply(self, balance: i64, delta: i64) -> LedgerResult<i64> {
        let result = match self {
            Self::Deposit => balance.checked_add(delta),
            Self::Withdrawal => balance.checked_sub(delta),
        };
        result.ok_or_else(|| LedgerError::InvalidAmount {
            value: delta.to_string(),
            reason: format!("{self} overflows balance {balance}"),
        })
    }
}

impl std::fmt::Display for BalanceChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

/// Parse a caller-supplied amount as a signed base-10 integer.
///
/// An optional leading `+` or `-` is accepted; surrounding whitespace is not.
pub fn parse_amount(value: &str) -> LedgerResult<i64> {
    value.parse::<i64>().map_err(|e| LedgerError::InvalidAmount {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
