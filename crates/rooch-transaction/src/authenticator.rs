//! Authenticators: the proof attached to transaction data.
//!
//! An [`Authenticator`] names an on-chain auth validator by id and carries
//! an opaque payload that validator understands. Two builtin validators are
//! produced here:
//!
//! - Session (id 0): `flag || signature || public key`, followed by
//!   `envelope tag || envelope data` when the envelope is not the raw hash.
//!   Raw-hash payloads omit the tag so they stay byte-compatible with
//!   payloads written before envelopes existed.
//! - Bitcoin (id 1): a canonically encoded [`AuthPayload`] carrying a
//!   wallet-style signed message.

use rooch_crypto::{
    Ed25519PublicKey, Keypair, PublicKey, Secp256k1Keypair, Secp256k1PublicKey,
    Secp256r1PublicKey, SignatureScheme,
};
use rooch_message::bitcoin::{BITCOIN_MESSAGE_PREFIX, ROOCH_MESSAGE_INFO};
use rooch_message::{BitcoinMessageEnvelope, Envelope, SigningEnvelope};
use rooch_primitives::address::BitcoinNetwork;
use rooch_primitives::bcs::{self, Decode, Encode};
use rooch_primitives::hash::sha256;
use rooch_primitives::util::{BcsReader, BcsWriter, VarInt};
use rooch_primitives::PrimitivesError;
use tracing::trace;

use crate::TransactionError;

/// Builtin auth validators and their on-chain ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinAuthValidator {
    Session,
    Bitcoin,
    /// Id reserved for multisig Bitcoin accounts; not produced here.
    BitcoinMultisign,
}

impl BuiltinAuthValidator {
    pub fn id(&self) -> u64 {
        match self {
            BuiltinAuthValidator::Session => 0,
            BuiltinAuthValidator::Bitcoin => 1,
            BuiltinAuthValidator::BitcoinMultisign => 2,
        }
    }

    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            0 => Some(BuiltinAuthValidator::Session),
            1 => Some(BuiltinAuthValidator::Bitcoin),
            2 => Some(BuiltinAuthValidator::BitcoinMultisign),
            _ => None,
        }
    }
}

/// Validator id plus validator-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticator {
    pub auth_validator_id: u64,
    pub payload: Vec<u8>,
}

impl Authenticator {
    /// Sign `tx_hash` through `envelope` with a local keypair and build a
    /// session authenticator.
    pub fn session<K: Keypair>(
        keypair: &K,
        tx_hash: &[u8; 32],
        envelope: &SigningEnvelope,
    ) -> Result<Self, TransactionError> {
        trace!(scheme = %keypair.scheme(), envelope = %envelope.envelope_type(), "session sign");
        let message = envelope.build_message(tx_hash)?;
        let signature = keypair.sign(&message)?;
        Self::session_with_signature(&keypair.public_key(), &signature, envelope)
    }

    /// Build a session authenticator from a signature produced elsewhere,
    /// such as by a WebAuthn authenticator.
    pub fn session_with_signature<P: PublicKey>(
        public_key: &P,
        signature: &[u8],
        envelope: &SigningEnvelope,
    ) -> Result<Self, TransactionError> {
        let public_key_bytes = public_key.to_bytes();
        let mut payload = Vec::with_capacity(1 + signature.len() + public_key_bytes.len());
        payload.push(public_key.scheme().flag());
        payload.extend_from_slice(signature);
        payload.extend_from_slice(&public_key_bytes);
        if *envelope != SigningEnvelope::RawTxHash {
            payload.extend_from_slice(&envelope.encode()?);
        }
        Ok(Authenticator {
            auth_validator_id: BuiltinAuthValidator::Session.id(),
            payload,
        })
    }

    /// Sign `tx_hash` as a Bitcoin wallet message and build a Bitcoin
    /// authenticator. The sender address is the key's mainnet P2TR address.
    pub fn bitcoin(keypair: &Secp256k1Keypair, tx_hash: &[u8; 32]) -> Result<Self, TransactionError> {
        let message = BitcoinMessageEnvelope.build_message(tx_hash)?;
        let signature = keypair.sign(&message)?;
        let public_key = keypair.public_key();
        let from_address = public_key
            .bitcoin_address()
            .format(BitcoinNetwork::Bitcoin)?;
        let payload = AuthPayload {
            signature,
            message_prefix: BITCOIN_MESSAGE_PREFIX.as_bytes().to_vec(),
            message_info: ROOCH_MESSAGE_INFO.as_bytes().to_vec(),
            public_key: public_key.to_bytes(),
            from_address: from_address.into_bytes(),
        };
        Ok(Authenticator {
            auth_validator_id: BuiltinAuthValidator::Bitcoin.id(),
            payload: bcs::to_bytes(&payload)?,
        })
    }

    /// Check the authenticator against `tx_hash` the way its validator would.
    ///
    /// Returns `Ok(false)` for a well-formed payload whose signature does not
    /// verify, and an error for a payload that cannot be parsed.
    pub fn verify(&self, tx_hash: &[u8; 32]) -> Result<bool, TransactionError> {
        match BuiltinAuthValidator::from_id(self.auth_validator_id) {
            Some(BuiltinAuthValidator::Session) => {
                SessionAuthenticator::from_payload(&self.payload)?.verify(tx_hash)
            }
            Some(BuiltinAuthValidator::Bitcoin) => {
                bcs::from_bytes::<AuthPayload>(&self.payload)?.verify(tx_hash)
            }
            _ => Err(TransactionError::InvalidAuthenticator(format!(
                "no local verifier for auth validator {}",
                self.auth_validator_id
            ))),
        }
    }
}

impl Encode for Authenticator {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        writer.write_u64_le(self.auth_validator_id);
        self.payload.encode(writer)
    }
}

impl Decode for Authenticator {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(Authenticator {
            auth_validator_id: reader.read_u64_le()?,
            payload: Vec::decode(reader)?,
        })
    }
}

// ---- Session payload ----

/// A parsed session authenticator payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAuthenticator {
    pub scheme: SignatureScheme,
    pub signature: Vec<u8>,
    pub public_key: Vec<u8>,
    pub envelope: SigningEnvelope,
}

impl SessionAuthenticator {
    /// Split a payload into scheme, signature, public key and envelope.
    pub fn from_payload(payload: &[u8]) -> Result<Self, TransactionError> {
        let (&flag, rest) = payload
            .split_first()
            .ok_or_else(|| TransactionError::InvalidAuthenticator("empty payload".into()))?;
        let scheme = SignatureScheme::from_flag(flag)?;
        let sig_len = scheme.signature_length();
        let pk_len = scheme.public_key_length();
        if rest.len() < sig_len + pk_len {
            return Err(TransactionError::InvalidAuthenticator(format!(
                "{} payload needs {} bytes after the flag, got {}",
                scheme,
                sig_len + pk_len,
                rest.len()
            )));
        }
        let (signature, rest) = rest.split_at(sig_len);
        let (public_key, rest) = rest.split_at(pk_len);
        // A raw-hash payload ends at the public key; an explicit tag is not canonical.
        let envelope = if rest.is_empty() {
            SigningEnvelope::RawTxHash
        } else {
            match SigningEnvelope::decode(rest)? {
                SigningEnvelope::RawTxHash => {
                    return Err(TransactionError::InvalidAuthenticator(
                        "raw tx hash envelope must not carry a type tag".into(),
                    ));
                }
                envelope => envelope,
            }
        };
        Ok(SessionAuthenticator {
            scheme,
            signature: signature.to_vec(),
            public_key: public_key.to_vec(),
            envelope,
        })
    }

    /// Replay the envelope over `tx_hash` and check the signature.
    pub fn verify(&self, tx_hash: &[u8; 32]) -> Result<bool, TransactionError> {
        let message = self.envelope.build_message(tx_hash)?;
        let valid = match self.scheme {
            SignatureScheme::Ed25519 => {
                Ed25519PublicKey::from_bytes(&self.public_key)?.verify(&message, &self.signature)
            }
            SignatureScheme::Secp256k1 => {
                Secp256k1PublicKey::from_bytes(&self.public_key)?.verify(&message, &self.signature)
            }
            SignatureScheme::EcdsaR1 => {
                Secp256r1PublicKey::from_bytes(&self.public_key)?.verify(&message, &self.signature)
            }
        };
        Ok(valid)
    }
}

// ---- Bitcoin payload ----

/// Payload of the Bitcoin auth validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    /// 64-byte compact ECDSA signature.
    pub signature: Vec<u8>,
    /// `"Bitcoin Signed Message:\n"`.
    pub message_prefix: Vec<u8>,
    /// `"Rooch Transaction:\n"`; the hex hash is appended when verifying.
    pub message_info: Vec<u8>,
    /// 33-byte compressed public key.
    pub public_key: Vec<u8>,
    /// UTF-8 Bitcoin address text.
    pub from_address: Vec<u8>,
}

impl AuthPayload {
    /// Rebuild the wallet message from the payload's own prefix and info.
    pub fn framed_message(&self, tx_hash: &[u8; 32]) -> Vec<u8> {
        let mut text = self.message_info.clone();
        text.extend_from_slice(hex::encode(tx_hash).as_bytes());
        let mut out = Vec::with_capacity(1 + self.message_prefix.len() + 9 + text.len());
        out.extend_from_slice(&VarInt::from(self.message_prefix.len()).to_bytes());
        out.extend_from_slice(&self.message_prefix);
        out.extend_from_slice(&VarInt::from(text.len()).to_bytes());
        out.extend_from_slice(&text);
        out
    }

    /// Check the signature and that `from_address` belongs to the key.
    pub fn verify(&self, tx_hash: &[u8; 32]) -> Result<bool, TransactionError> {
        let public_key = Secp256k1PublicKey::from_bytes(&self.public_key)?;
        let address = public_key.bitcoin_address().format(BitcoinNetwork::Bitcoin)?;
        if address.as_bytes() != self.from_address.as_slice() {
            return Ok(false);
        }
        let message = sha256(&self.framed_message(tx_hash));
        Ok(public_key.verify(&message, &self.signature))
    }
}

impl Encode for AuthPayload {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.signature.encode(writer)?;
        self.message_prefix.encode(writer)?;
        self.message_info.encode(writer)?;
        self.public_key.encode(writer)?;
        self.from_address.encode(writer)
    }
}

impl Decode for AuthPayload {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(AuthPayload {
            signature: Vec::decode(reader)?,
            message_prefix: Vec::decode(reader)?,
            message_info: Vec::decode(reader)?,
            public_key: Vec::decode(reader)?,
            from_address: Vec::decode(reader)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rooch_crypto::Ed25519Keypair;
    use rooch_message::WebauthnEnvelope;

    const HASH: [u8; 32] = [0x77; 32];

    #[test]
    fn test_raw_session_payload_layout() {
        let kp = Ed25519Keypair::generate();
        let auth = Authenticator::session(&kp, &HASH, &SigningEnvelope::RawTxHash).unwrap();
        assert_eq!(auth.auth_validator_id, 0);
        assert_eq!(auth.payload.len(), 1 + 64 + 32);
        assert_eq!(auth.payload[0], 0x00);
        assert_eq!(&auth.payload[65..], kp.public_key().to_bytes().as_slice());
        assert!(auth.verify(&HASH).unwrap());
        assert!(!auth.verify(&[0x78; 32]).unwrap());
    }

    #[test]
    fn test_explicit_raw_tx_hash_tag_rejected() {
        let kp = Ed25519Keypair::generate();
        let auth = Authenticator::session(&kp, &HASH, &SigningEnvelope::RawTxHash).unwrap();
        assert!(SessionAuthenticator::from_payload(&auth.payload).is_ok());

        let mut tagged = auth.payload.clone();
        tagged.push(0x00);
        assert!(matches!(
            SessionAuthenticator::from_payload(&tagged),
            Err(TransactionError::InvalidAuthenticator(_))
        ));
    }

    #[test]
    fn test_session_payload_with_bitcoin_envelope() {
        let kp = Secp256k1Keypair::generate();
        let envelope = SigningEnvelope::BitcoinMessage(BitcoinMessageEnvelope);
        let auth = Authenticator::session(&kp, &HASH, &envelope).unwrap();
        assert_eq!(auth.payload.len(), 1 + 64 + 33 + 1);
        assert_eq!(*auth.payload.last().unwrap(), 0x01);

        let parsed = SessionAuthenticator::from_payload(&auth.payload).unwrap();
        assert_eq!(parsed.scheme, SignatureScheme::Secp256k1);
        assert_eq!(parsed.envelope, envelope);
        assert!(parsed.verify(&HASH).unwrap());
    }

    #[test]
    fn test_webauthn_challenge_mismatch_surfaces() {
        let kp = Ed25519Keypair::generate();
        let envelope = SigningEnvelope::WebAuthn(WebauthnEnvelope::new(
            vec![0; 37],
            br#"{"type":"webauthn.get","challenge":"AAAA"}"#.to_vec(),
        ));
        assert!(matches!(
            Authenticator::session(&kp, &HASH, &envelope),
            Err(TransactionError::Message(
                rooch_message::MessageError::ChallengeMismatch { .. }
            ))
        ));
    }

    #[test]
    fn test_bitcoin_authenticator() {
        let kp = Secp256k1Keypair::generate();
        let auth = Authenticator::bitcoin(&kp, &HASH).unwrap();
        assert_eq!(auth.auth_validator_id, 1);
        let payload: AuthPayload = bcs::from_bytes(&auth.payload).unwrap();
        assert_eq!(payload.message_prefix, b"Bitcoin Signed Message:\n");
        assert_eq!(payload.message_info, b"Rooch Transaction:\n");
        assert_eq!(
            payload.framed_message(&HASH),
            BitcoinMessageEnvelope::build_bitcoin_message(&HASH)
        );
        assert!(String::from_utf8(payload.from_address.clone())
            .unwrap()
            .starts_with("bc1p"));
        assert!(auth.verify(&HASH).unwrap());
        assert!(!auth.verify(&[0; 32]).unwrap());
    }

    #[test]
    fn test_truncated_and_unknown_payloads() {
        assert!(SessionAuthenticator::from_payload(&[]).is_err());
        assert!(SessionAuthenticator::from_payload(&[0x00; 40]).is_err());
        assert!(SessionAuthenticator::from_payload(&[0x09; 100]).is_err());
        let unknown = Authenticator {
            auth_validator_id: 2,
            payload: vec![],
        };
        assert!(matches!(
            unknown.verify(&HASH),
            Err(TransactionError::InvalidAuthenticator(_))
        ));
    }
}
