//! Function-name dispatch for the chain bank core.
//!
//! A host hands [`BankChaincode`] a function name and positional string
//! arguments. The [`router`] checks the name and arity, the handler runs the
//! matching ledger or probe operation against the state store, and the
//! caller gets back either a byte payload or a [`DispatchError`].
//!
//! | Function | Args | Effect |
//! |---|---|---|
//! | `init` | 1 (ignored) | empty the account index |
//! | `make_account` | id, balance, name | create account, index it |
//! | `deposit` / `withdrawal` | id, amount | adjust balance |
//! | `read` | id | raw account record |
//! | `seeAll` | none | every indexed record |
//! | `work` | key, key, key | fork-join probe |
//! | `check` | key | single-delay probe |

pub mod config;
pub mod error;
pub mod handler;
pub mod router;

pub use config::{BankConfig, SeeAllFormat};
pub use error::{DispatchError, DispatchResult, ErrorKind};
pub use handler::{BankChaincode, Chaincode};
pub use router::{route, Call, Function};
