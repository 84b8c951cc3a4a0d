use thiserror::Error;

/// Errors raised while running a probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("store error: {0}")]
    Store(#[from] bank_store::StoreError),

    /// The background writer panicked or was aborted by the runtime.
    #[error("background writer failed: {0}")]
    Join(String),
}

pub type ProbeResult<T> = Result<T, ProbeError>;
