//! Maps a function name and its positional arguments to a typed call.

use std::fmt;

use crate::error::{DispatchError, DispatchResult};

/// A routed call with its arguments bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Init,
    MakeAccount {
        id: String,
        balance: String,
        name: String,
    },
    Deposit {
        id: String,
        amount: String,
    },
    Withdrawal {
        id: String,
        amount: String,
    },
    Read {
        id: String,
    },
    SeeAll,
    Work {
        first: String,
        delayed: String,
        last: String,
    },
    Check {
        key: String,
    },
}

/// Dispatchable function names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Function {
    Init,
    MakeAccount,
    Deposit,
    Withdrawal,
    Read,
    SeeAll,
    Work,
    Check,
}

impl Function {
    pub const ALL: [Function; 8] = [
        Self::Init,
        Self::MakeAccount,
        Self::Deposit,
        Self::Withdrawal,
        Self::Read,
        Self::SeeAll,
        Self::Work,
        Self::Check,
    ];

    /// Resolve a wire name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::MakeAccount => "make_account",
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Read => "read",
            Self::SeeAll => "seeAll",
            Self::Work => "work",
            Self::Check => "check",
        }
    }

    /// Exact number of positional arguments the function takes.
    pub fn arity(self) -> usize {
        match self {
            Self::SeeAll => 0,
            Self::Init | Self::Read | Self::Check => 1,
            Self::Deposit | Self::Withdrawal => 2,
            Self::MakeAccount | Self::Work => 3,
        }
    }

    /// Read-only functions, the only ones the query entry point accepts.
    pub fn is_query(self) -> bool {
        matches!(self, Self::Read | Self::SeeAll)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Route `name` with `args` to a [`Call`], checking the argument count.
pub fn route(name: &str, args: &[String]) -> DispatchResult<Call> {
    let function =
        Function::from_name(name).ok_or_else(|| DispatchError::UnknownFunction(name.to_string()))?;
    bind(function, args)
}

/// Bind `args` to an already-resolved function.
pub fn bind(function: Function, args: &[String]) -> DispatchResult<Call> {
    if args.len() != function.arity() {
        return Err(DispatchError::BadArgumentCount {
            function: function.name().to_string(),
            expected: function.arity(),
            got: args.len(),
        });
    }

    let arg = |i: usize| args[i].clone();
    Ok(match function {
        Function::Init => Call::Init,
        Function::MakeAccount => Call::MakeAccount {
            id: arg(0),
            balance: arg(1),
            name: arg(2),
        },
        Function::Deposit => Call::Deposit {
            id: arg(0),
            amount: arg(1),
        },
        Function::Withdrawal => Call::Withdrawal {
            id: arg(0),
            amount: arg(1),
        },
        Function::Read => Call::Read { id: arg(0) },
        Function::SeeAll => Call::SeeAll,
        Function::Work => Call::Work {
            first: arg(0),
            delayed: arg(1),
            last: arg(2),
        },
        Function::Check => Call::Check { key: arg(0) },
    })
}
