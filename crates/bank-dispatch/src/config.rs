use std::fs;
use std::path::Path;

use bank_ledger::LedgerConfig;
use bank_probe::ProbeConfig;
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult};

/// How `seeAll` renders the scanned records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeeAllFormat {
    /// Raw records back to back with no separator. This is what existing
    /// consumers read, even though it cannot be split back into records in
    /// general.
    #[default]
    Concatenated,
    /// A JSON array of decoded account records.
    Json,
}

/// Top-level configuration for a [`BankChaincode`](crate::BankChaincode).
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// index_key = "bank/index"
/// see_all_format = "json"
///
/// [probe]
/// delay_ms = 50000
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub index_key: String,
    pub serialize_writes: bool,
    pub see_all_format: SeeAllFormat,
    pub probe: ProbeConfig,
}

impl Default for BankConfig {
    fn default() -> Self {
        let ledger = LedgerConfig::default();
        Self {
            index_key: ledger.index_key,
            serialize_writes: ledger.serialize_writes,
            see_all_format: SeeAllFormat::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl BankConfig {
    pub fn from_toml_str(raw: &str) -> DispatchResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| DispatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> DispatchResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| DispatchError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> DispatchResult<String> {
        toml::to_string_pretty(self).map_err(|e| DispatchError::Config(e.to_string()))
    }

    pub fn validate(&self) -> DispatchResult<()> {
        if self.index_key.is_empty() {
            return Err(DispatchError::Config("index_key must not be empty".into()));
        }
        Ok(())
    }

    pub fn ledger(&self) -> LedgerConfig {
        LedgerConfig {
            index_key: self.index_key.clone(),
            serialize_writes: self.serialize_writes,
        }
    }
}
