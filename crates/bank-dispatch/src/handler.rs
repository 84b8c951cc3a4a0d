use std::sync::Arc;

use async_trait::async_trait;
use bank_ledger::{Account, AccountLedger, BalanceChange};
use bank_probe::{Probe, ProbeMode};
use bank_store::StateStore;
use tracing::{debug, info, warn};

use crate::config::{BankConfig, SeeAllFormat};
use crate::error::{DispatchError, DispatchResult};
use crate::router::{self, Call, Function};

/// Entry points a host drives: one for state-changing calls, one for reads.
///
/// Success is an opaque payload (empty for mutating calls); failure is a
/// [`DispatchError`] whose `Display` is the message returned to the caller.
#[async_trait]
pub trait Chaincode: Send + Sync {
    /// Run any dispatchable function.
    async fn invoke(&self, function: &str, args: &[String]) -> DispatchResult<Vec<u8>>;

    /// Run a read-only function. Mutating names are reported as unknown.
    async fn query(&self, function: &str, args: &[String]) -> DispatchResult<Vec<u8>>;
}

/// The account ledger, its index, and the diagnostic probe behind one
/// dispatch surface.
pub struct BankChaincode {
    ledger: AccountLedger,
    probe: Probe,
    see_all_format: SeeAllFormat,
}

impl BankChaincode {
    pub fn new(store: Arc<dyn StateStore>, config: &BankConfig) -> Self {
        Self {
            ledger: AccountLedger::new(Arc::clone(&store), config.ledger()),
            probe: Probe::new(store, config.probe.clone()),
            see_all_format: config.see_all_format,
        }
    }

    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    /// Execute an already-routed call.
    pub async fn execute(&self, call: Call) -> DispatchResult<Vec<u8>> {
        match call {
            Call::Init => {
                self.ledger.init()?;
                Ok(Vec::new())
            }
            Call::MakeAccount { id, balance, name } => {
                self.ledger.create(&id, &balance, &name)?;
                Ok(Vec::new())
            }
            Call::Deposit { id, amount } => {
                self.ledger.adjust_balance(&id, &amount, BalanceChange::Deposit)?;
                Ok(Vec::new())
            }
            Call::Withdrawal { id, amount } => {
                self.ledger
                    .adjust_balance(&id, &amount, BalanceChange::Withdrawal)?;
                Ok(Vec::new())
            }
            Call::Read { id } => Ok(self.ledger.read(&id)?),
            Call::SeeAll => self.see_all(),
            Call::Work {
                first,
                delayed,
                last,
            } => {
                self.run_probe(ProbeMode::ForkJoin {
                    first,
                    delayed,
                    last,
                })
                .await
            }
            Call::Check { key } => self.run_probe(ProbeMode::SingleDelay { key }).await,
        }
    }

    // Probe keys share the store with the ledger, so the index sentinel is
    // off limits here too.
    async fn run_probe(&self, mode: ProbeMode) -> DispatchResult<Vec<u8>> {
        let keys: Vec<&str> = match &mode {
            ProbeMode::ForkJoin {
                first,
                delayed,
                last,
            } => vec![first.as_str(), delayed.as_str(), last.as_str()],
            ProbeMode::SingleDelay { key } => vec![key.as_str()],
        };
        for key in keys {
            self.ledger.ensure_not_reserved(key)?;
        }
        self.probe.run(&mode).await?;
        Ok(Vec::new())
    }

    fn see_all(&self) -> DispatchResult<Vec<u8>> {
        let records = self.ledger.enumerate_all()?;
        match self.see_all_format {
            SeeAllFormat::Concatenated => {
                Ok(records.into_iter().flat_map(|r| r.bytes).collect())
            }
            SeeAllFormat::Json => {
                let accounts = records
                    .iter()
                    .map(|r| Account::decode(&r.id, &r.bytes))
                    .collect::<Result<Vec<_>, _>>()?;
                serde_json::to_vec(&accounts)
                    .map_err(|e| DispatchError::Serialization(e.to_string()))
            }
        }
    }

    async fn dispatch(
        &self,
        function: &str,
        args: &[String],
        queries_only: bool,
    ) -> DispatchResult<Vec<u8>> {
        let result = match Function::from_name(function) {
            Some(f) if !queries_only || f.is_query() => match router::bind(f, args) {
                Ok(call) => self.execute(call).await,
                Err(e) => Err(e),
            },
            _ => Err(DispatchError::UnknownFunction(function.to_string())),
        };

        match &result {
            Ok(payload) => debug!(function, len = payload.len(), "dispatch succeeded"),
            Err(e) => warn!(function, kind = %e.kind(), error = %e, "dispatch failed"),
        }
        result
    }
}

#[async_trait]
impl Chaincode for BankChaincode {
    async fn invoke(&self, function: &str, args: &[String]) -> DispatchResult<Vec<u8>> {
        info!(function, args = args.len(), "invoke");
        self.dispatch(function, args, false).await
    }

    async fn query(&self, function: &str, args: &[String]) -> DispatchResult<Vec<u8>> {
        info!(function, args = args.len(), "query");
        self.dispatch(function, args, true).await
    }
}

impl std::fmt::Debug for BankChaincode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankChaincode")
            .field("ledger", &self.ledger)
            .field("probe", &self.probe)
            .field("see_all_format", &self.see_all_format)
            .finish()
    }
}
