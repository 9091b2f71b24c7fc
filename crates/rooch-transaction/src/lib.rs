/// Rooch SDK - Transaction assembly, argument encoding and authenticators.
///
/// Provides the Move action and entry-function argument types, the
/// `TransactionData` that gets hashed, session and Bitcoin authenticators,
/// and the Built → Prepared → Signed `Transaction` state machine.

pub mod action;
pub mod function_arg;
pub mod data;
pub mod authenticator;
pub mod transaction;

mod error;
pub use error::TransactionError;
pub use action::{FunctionCall, FunctionId, MoveAction, ScriptCall};
pub use authenticator::{Authenticator, BuiltinAuthValidator, SessionAuthenticator};
pub use data::{TransactionData, DEFAULT_MAX_GAS_AMOUNT};
pub use function_arg::FunctionArg;
pub use transaction::{SignedTransaction, Transaction, TransactionState};
