#![deny(missing_docs)]

//! Rooch SDK - Async JSON-RPC client.
//!
//! Provides:
//! - The [`RpcTransport`] boundary and a JSON-RPC 2.0 [`HttpTransport`]
//! - [`RoochClient`]: chain id, view functions, state queries, signed
//!   transaction submission, balances and session keys
//! - Builders for the framework calls behind session keys and transfers
//! - Typed views of the node's JSON results

pub mod calls;
pub mod client;
pub mod session;
pub mod transport;
pub mod types;

mod error;
pub use client::RoochClient;
pub use error::{ClientError, TransportError};
pub use session::{CreateSessionArgs, SessionInfo, SessionScope};
pub use transport::{HttpTransport, RpcTransport};
pub use types::{ClientConfig, Page, RoochNetwork, StateOptions, TxOptions};
