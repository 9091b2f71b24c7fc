#![deny(missing_docs)]

//! Rooch SDK - Signing envelopes.
//!
//! An envelope decides which bytes a key signs for a given transaction hash:
//! the hash itself, a Bitcoin signed-message frame around it, or a WebAuthn
//! assertion whose challenge is the hash.

mod error;
pub mod bitcoin;
pub mod envelope;
pub mod webauthn;

pub use bitcoin::BitcoinMessageEnvelope;
pub use envelope::{Envelope, EnvelopeType, RawTxHashEnvelope, SigningEnvelope};
pub use error::MessageError;
pub use webauthn::{canonicalize_signature, WebauthnEnvelope};
