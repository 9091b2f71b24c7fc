#![deny(missing_docs)]

//! Rooch SDK - Complete SDK.
//!
//! Re-exports all Rooch SDK components for convenient single-crate usage.

pub use rooch_client as client;
pub use rooch_crypto as crypto;
pub use rooch_message as message;
pub use rooch_primitives as primitives;
pub use rooch_transaction as transaction;

/// The types most callers need to build, sign and submit a transaction.
pub mod prelude {
    pub use rooch_client::{ClientConfig, RoochClient, RoochNetwork};
    pub use rooch_crypto::{Ed25519Keypair, Keypair, PublicKey, Secp256k1Keypair};
    pub use rooch_message::SigningEnvelope;
    pub use rooch_primitives::address::RoochAddress;
    pub use rooch_transaction::{FunctionArg, MoveAction, Transaction};
}
