//! Bitcoin signed-message envelope.
//!
//! The transaction hash is wrapped the way Bitcoin wallets frame
//! `signmessage` input:
//!
//! ```text
//! 0x18 || "Bitcoin Signed Message:\n" || varint(len(text)) || text
//! text = "Rooch Transaction:\n" || hex(tx_hash)
//! ```
//!
//! Wallets sign `SHA-256d(framed)`. A Secp256k1 keypair hashes its input
//! once more before signing, so [`Envelope::build_message`] hands it
//! `SHA-256(framed)` and the final signed digest is the double hash.

use rooch_primitives::hash::{sha256, sha256d};
use rooch_primitives::util::VarInt;

use crate::envelope::{Envelope, EnvelopeType};
use crate::MessageError;

/// Magic prefix of a Bitcoin signed message (without its length byte).
pub const BITCOIN_MESSAGE_PREFIX: &str = "Bitcoin Signed Message:\n";

/// Text placed before the hex transaction hash.
pub const ROOCH_MESSAGE_INFO: &str = "Rooch Transaction:\n";

/// Envelope that frames the transaction hash as a Bitcoin signed message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitcoinMessageEnvelope;

impl BitcoinMessageEnvelope {
    /// The human-readable text a wallet displays: info line plus hex hash.
    pub fn message_text(tx_hash: &[u8; 32]) -> String {
        format!("{}{}", ROOCH_MESSAGE_INFO, hex::encode(tx_hash))
    }

    /// The full framed message, before any hashing.
    pub fn build_bitcoin_message(tx_hash: &[u8; 32]) -> Vec<u8> {
        let text = Self::message_text(tx_hash);
        let mut out = Vec::with_capacity(1 + BITCOIN_MESSAGE_PREFIX.len() + 9 + text.len());
        out.push(BITCOIN_MESSAGE_PREFIX.len() as u8);
        out.extend_from_slice(BITCOIN_MESSAGE_PREFIX.as_bytes());
        out.extend_from_slice(&VarInt::from(text.len()).to_bytes());
        out.extend_from_slice(text.as_bytes());
        out
    }
}

impl Envelope for BitcoinMessageEnvelope {
    fn envelope_type(&self) -> EnvelopeType {
        EnvelopeType::BitcoinMessageV0
    }

    fn build_message(&self, tx_hash: &[u8; 32]) -> Result<Vec<u8>, MessageError> {
        Ok(sha256(&Self::build_bitcoin_message(tx_hash)).to_vec())
    }

    fn compute_digest(&self, tx_hash: &[u8; 32]) -> Result<Vec<u8>, MessageError> {
        Ok(sha256d(&Self::build_bitcoin_message(tx_hash)).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rooch_crypto::{Keypair, PublicKey, Secp256k1Keypair};

    #[test]
    fn test_framing_of_zero_hash() {
        let framed = BitcoinMessageEnvelope::build_bitcoin_message(&[0u8; 32]);
        let mut expected = vec![0x18];
        expected.extend_from_slice(b"Bitcoin Signed Message:\n");
        expected.push(83);
        expected.extend_from_slice(b"Rooch Transaction:\n");
        expected.extend_from_slice("0".repeat(64).as_bytes());
        assert_eq!(framed, expected);
        assert_eq!(framed.len(), 1 + 24 + 1 + 83);
    }

    #[test]
    fn test_digest_is_double_hash_of_framed() {
        let hash = [0x5a; 32];
        let framed = BitcoinMessageEnvelope::build_bitcoin_message(&hash);
        let envelope = BitcoinMessageEnvelope;
        let message = envelope.build_message(&hash).unwrap();
        let digest = envelope.compute_digest(&hash).unwrap();
        assert_eq!(message, sha256(&framed).to_vec());
        assert_eq!(digest, sha256(&message).to_vec());
        assert_eq!(digest, sha256d(&framed).to_vec());
    }

    #[test]
    fn test_secp256k1_signature_over_message_verifies() {
        let kp = Secp256k1Keypair::generate();
        let hash = [0x11; 32];
        let message = BitcoinMessageEnvelope.build_message(&hash).unwrap();
        let sig = kp.sign(&message).unwrap();
        assert!(kp.public_key().verify(&message, &sig));
        let other = BitcoinMessageEnvelope.build_message(&[0x12; 32]).unwrap();
        assert!(!kp.public_key().verify(&other, &sig));
    }
}
