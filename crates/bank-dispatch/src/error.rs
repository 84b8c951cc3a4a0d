use bank_index::IndexError;
use bank_ledger::LedgerError;
use bank_probe::ProbeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("incorrect number of arguments for {function}: expected {expected}, got {got}")]
    BadArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("received unknown function invocation: {0}")]
    UnknownFunction(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Failure class reported to callers, independent of which layer failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadArgumentCount,
    UnknownFunction,
    StoreError,
    NotFound,
    MalformedAccount,
    MalformedIndex,
    InvalidAmount,
    ReservedKey,
    Config,
    Internal,
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadArgumentCount { .. } => ErrorKind::BadArgumentCount,
            Self::UnknownFunction(_) => ErrorKind::UnknownFunction,
            Self::Ledger(e) => match e {
                LedgerError::NotFound(_) => ErrorKind::NotFound,
                LedgerError::MalformedAccount { .. } => ErrorKind::MalformedAccount,
                LedgerError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
                LedgerError::ReservedKey(_) => ErrorKind::ReservedKey,
                LedgerError::Store(_) | LedgerError::Index(IndexError::Store(_)) => {
                    ErrorKind::StoreError
                }
                LedgerError::Index(IndexError::Malformed { .. }) => ErrorKind::MalformedIndex,
                LedgerError::Index(IndexError::Serialization(_))
                | LedgerError::Serialization(_) => ErrorKind::Internal,
            },
            Self::Probe(ProbeError::Store(_)) => ErrorKind::StoreError,
            Self::Probe(ProbeError::Join(_)) => ErrorKind::Internal,
            Self::Config(_) => ErrorKind::Config,
            Self::Serialization(_) => ErrorKind::Internal,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_store::StoreError;

    #[test]
    fn ledger_errors_map_to_kinds() {
        let cases = [
            (LedgerError::NotFound("a".into()), ErrorKind::NotFound),
            (
                LedgerError::MalformedAccount {
                    id: "a".into(),
                    reason: "r".into(),
                },
                ErrorKind::MalformedAccount,
            ),
            (
                LedgerError::InvalidAmount {
                    value: "x".into(),
                    reason: "r".into(),
                },
                ErrorKind::InvalidAmount,
            ),
            (LedgerError::Store(StoreError::EmptyKey), ErrorKind::StoreError),
            (
                LedgerError::Index(IndexError::Store(StoreError::EmptyKey)),
                ErrorKind::StoreError,
            ),
            (
                LedgerError::Index(IndexError::Malformed {
                    key: "index".into(),
                    reason: "r".into(),
                }),
                ErrorKind::MalformedIndex,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(DispatchError::from(err).kind(), kind);
        }
    }

    #[test]
    fn message_for_bad_arity() {
        let err = DispatchError::BadArgumentCount {
            function: "deposit".into(),
            expected: 2,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "incorrect number of arguments for deposit: expected 2, got 1"
        );
        assert_eq!(err.kind().to_string(), "BadArgumentCount");
    }

    #[test]
    fn probe_store_error_is_store_kind() {
        let err = DispatchError::from(ProbeError::Store(StoreError::EmptyKey));
        assert_eq!(err.kind(), ErrorKind::StoreError);
    }
}
