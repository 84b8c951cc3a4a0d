use std::sync::Arc;
use std::time::Duration;

use bank_store::StateStore;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::ProbeConfig;
use crate::error::{ProbeError, ProbeResult};

/// Which shape of probe to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeMode {
    /// Write `first`, spawn one task that sleeps then writes `delayed`,
    /// wait for it, then write `last`.
    ForkJoin {
        first: String,
        delayed: String,
        last: String,
    },
    /// Sleep, then write `key`. Nothing runs concurrently.
    SingleDelay { key: String },
}

/// What a completed probe wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeReport {
    /// Keys in the order their writes completed.
    pub written: Vec<String>,
    /// Wall-clock time the probe held the caller.
    pub elapsed: Duration,
}

/// Issues delayed writes against a shared store to check that the host
/// commits state written off the main request path.
///
/// There is no cancellation: a running probe holds its caller until the
/// delay elapses and the final write lands.
pub struct Probe {
    store: Arc<dyn StateStore>,
    config: ProbeConfig,
}

impl Probe {
    pub fn new(store: Arc<dyn StateStore>, config: ProbeConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub async fn run(&self, mode: &ProbeMode) -> ProbeResult<ProbeReport> {
        match mode {
            ProbeMode::ForkJoin {
                first,
                delayed,
                last,
            } => self.fork_join(first, delayed, last).await,
            ProbeMode::SingleDelay { key } => self.single_delay(key).await,
        }
    }

    /// Fork-join mode.
    ///
    /// Ordering: the write to `first` happens before the task is spawned, and
    /// the task's write to `delayed` happens before the write to `last`.
    pub async fn fork_join(
        &self,
        first: &str,
        delayed: &str,
        last: &str,
    ) -> ProbeResult<ProbeReport> {
        let started = Instant::now();
        let delay = self.config.delay();

        self.store.put(first, self.config.first_marker.as_bytes())?;
        debug!(key = first, "probe first write");

        let store = Arc::clone(&self.store);
        let key = delayed.to_string();
        let marker = self.config.delayed_marker.clone();
        let writer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.put(&key, marker.as_bytes())?;
            debug!(key = %key, "probe delayed write");
            Ok::<_, ProbeError>(())
        });

        writer
            .await
            .map_err(|e| ProbeError::Join(e.to_string()))??;

        self.store.put(last, self.config.last_marker.as_bytes())?;
        let elapsed = started.elapsed();
        info!(
            first,
            delayed,
            last,
            elapsed_ms = elapsed.as_millis() as u64,
            "fork-join probe complete"
        );

        Ok(ProbeReport {
            written: vec![first.to_string(), delayed.to_string(), last.to_string()],
            elapsed,
        })
    }

    /// Single-delay mode: sleep on the caller's task, then write once.
    pub async fn single_delay(&self, key: &str) -> ProbeResult<ProbeReport> {
        let started = Instant::now();
        tokio::time::sleep(self.config.delay()).await;
        self.store.put(key, self.config.delayed_marker.as_bytes())?;
        let elapsed = started.elapsed();
        info!(
            key,
            elapsed_ms = elapsed.as_millis() as u64,
            "single-delay probe complete"
        );

        Ok(ProbeReport {
            written: vec![key.to_string()],
            elapsed,
        })
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe").field("config", &self.config).finish()
    }
}
