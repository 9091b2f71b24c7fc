/// Rooch SDK - Keypairs, signature schemes and key derivation.
///
/// This crate provides:
/// - The scheme-independent `Keypair` and `PublicKey` traits
/// - Ed25519 keypairs (SLIP-0010 derivation)
/// - Secp256k1 keypairs with ECDSA signing and BIP-86 Taproot addresses
/// - Verify-only P-256 public keys for WebAuthn passkeys
/// - `roochsecretkey` bech32 secret key text
/// - DER signature parsing and low-S normalization

pub mod keypair;
pub mod ed25519;
pub mod secp256k1;
pub mod secp256r1;
pub mod secret_key;
pub mod derive;
pub mod signature;

mod error;
pub use error::CryptoError;

pub use ed25519::{Ed25519Keypair, Ed25519PublicKey};
pub use keypair::{Keypair, PublicKey, SecretKeyInput, SignatureScheme};
pub use secp256k1::{Secp256k1Keypair, Secp256k1PublicKey};
pub use secp256r1::Secp256r1PublicKey;
