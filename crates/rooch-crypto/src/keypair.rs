//! Scheme-independent key interfaces.
//!
//! Each signature scheme provides its own [`Keypair`] and [`PublicKey`]
//! types; nothing is shared between schemes except these traits and the
//! one-byte [`SignatureScheme`] flag that tags public keys in addresses,
//! authenticators and exported secrets.

use std::fmt;

use rooch_primitives::address::{BitcoinAddress, RoochAddress};

use crate::CryptoError;

/// Message signed and verified when importing secret material.
pub(crate) const CANARY_MESSAGE: &[u8] = b"rooch secret key canary";

/// The signature scheme a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    Ed25519,
    Secp256k1,
    /// P-256, used by WebAuthn passkeys. Verification only.
    EcdsaR1,
}

impl SignatureScheme {
    /// The one-byte flag that prefixes scheme-tagged public keys.
    pub fn flag(&self) -> u8 {
        match self {
            SignatureScheme::Ed25519 => 0x00,
            SignatureScheme::Secp256k1 => 0x01,
            SignatureScheme::EcdsaR1 => 0x02,
        }
    }

    pub fn from_flag(flag: u8) -> Result<Self, CryptoError> {
        match flag {
            0x00 => Ok(SignatureScheme::Ed25519),
            0x01 => Ok(SignatureScheme::Secp256k1),
            0x02 => Ok(SignatureScheme::EcdsaR1),
            other => Err(CryptoError::UnknownScheme(other)),
        }
    }

    /// Byte length of a public key in this scheme.
    pub fn public_key_length(&self) -> usize {
        match self {
            SignatureScheme::Ed25519 => 32,
            SignatureScheme::Secp256k1 | SignatureScheme::EcdsaR1 => 33,
        }
    }

    /// Byte length of a signature in this scheme.
    pub fn signature_length(&self) -> usize {
        64
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureScheme::Ed25519 => f.write_str("ED25519"),
            SignatureScheme::Secp256k1 => f.write_str("Secp256k1"),
            SignatureScheme::EcdsaR1 => f.write_str("EcdsaR1"),
        }
    }
}

/// A public key of one signature scheme.
pub trait PublicKey: fmt::Debug + Send + Sync {
    fn scheme(&self) -> SignatureScheme;

    /// Raw public key bytes (no scheme flag).
    fn to_bytes(&self) -> Vec<u8>;

    /// Check `signature` over `message` under the scheme's signing rules.
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;

    /// The Rooch account this key controls.
    fn rooch_address(&self) -> RoochAddress;

    /// `flag || public key`.
    fn to_flagged_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.scheme().flag()];
        out.extend_from_slice(&self.to_bytes());
        out
    }
}

/// A secret key of one signature scheme, with its derived public key.
///
/// Signing is a pure function of the secret and the message, so a keypair
/// can sign from several threads at once.
pub trait Keypair: Send + Sync {
    type PublicKey: PublicKey;

    fn public_key(&self) -> Self::PublicKey;

    fn scheme(&self) -> SignatureScheme;

    /// Sign `message`, returning the scheme's fixed-length compact signature.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Export the secret as `roochsecretkey1...` text.
    fn export_secret_key(&self) -> Result<String, CryptoError>;

    fn rooch_address(&self) -> RoochAddress {
        self.public_key().rooch_address()
    }

    /// The Bitcoin address for schemes that have one.
    fn bitcoin_address(&self) -> Option<BitcoinAddress> {
        None
    }
}

/// Where imported secret material comes from.
#[derive(Debug, Clone, Copy)]
pub enum SecretKeyInput<'a> {
    /// 32 raw secret bytes.
    Bytes(&'a [u8]),
    /// Scheme-tagged `roochsecretkey1...` text.
    Encoded(&'a str),
}

impl<'a> From<&'a [u8]> for SecretKeyInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        SecretKeyInput::Bytes(bytes)
    }
}

impl<'a> From<&'a [u8; 32]> for SecretKeyInput<'a> {
    fn from(bytes: &'a [u8; 32]) -> Self {
        SecretKeyInput::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for SecretKeyInput<'a> {
    fn from(text: &'a str) -> Self {
        SecretKeyInput::Encoded(text)
    }
}

/// Sign the canary message and verify it against the derived public key.
pub(crate) fn check_canary<K: Keypair>(keypair: &K) -> Result<(), CryptoError> {
    let signature = keypair
        .sign(CANARY_MESSAGE)
        .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
    if keypair.public_key().verify(CANARY_MESSAGE, &signature) {
        Ok(())
    } else {
        Err(CryptoError::InvalidSecretKey(
            "canary signature does not verify against derived public key".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_flags_roundtrip() {
        for scheme in [
            SignatureScheme::Ed25519,
            SignatureScheme::Secp256k1,
            SignatureScheme::EcdsaR1,
        ] {
            assert_eq!(SignatureScheme::from_flag(scheme.flag()).unwrap(), scheme);
        }
        assert!(matches!(
            SignatureScheme::from_flag(9),
            Err(CryptoError::UnknownScheme(9))
        ));
    }
}
