//! P-256 public keys, as held by WebAuthn passkeys.
//!
//! The private half never leaves the authenticator, so there is no keypair
//! type here: only verification and address derivation.

use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rooch_primitives::address::RoochAddress;
use rooch_primitives::hash::blake2b256;

use crate::keypair::{PublicKey, SignatureScheme};
use crate::signature::EcdsaSignature;
use crate::CryptoError;

/// A compressed P-256 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Secp256r1PublicKey {
    inner: VerifyingKey,
}

impl Secp256r1PublicKey {
    pub const LENGTH: usize = 33;

    /// Parse a SEC1 public key (compressed or uncompressed).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Secp256r1PublicKey { inner })
    }

    pub fn to_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out.copy_from_slice(self.inner.to_encoded_point(true).as_bytes());
        out
    }

    /// Verify a DER signature as produced by an authenticator. The signature
    /// is normalized to low S before checking.
    pub fn verify_der(&self, message: &[u8], der: &[u8]) -> Result<bool, CryptoError> {
        let compact = EcdsaSignature::from_der(der)?
            .normalize_s()
            .to_compact();
        Ok(self.verify(message, &compact))
    }
}

impl PublicKey for Secp256r1PublicKey {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::EcdsaR1
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.to_compressed().to_vec()
    }

    /// Verify a compact `r || s` signature over `SHA-256(message)`.
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match Signature::from_slice(signature) {
            Ok(sig) => self.inner.verify(message, &sig).is_ok(),
            Err(_) => false,
        }
    }

    fn rooch_address(&self) -> RoochAddress {
        RoochAddress::new(blake2b256(&[
            &[SignatureScheme::EcdsaR1.flag()],
            &self.to_compressed(),
        ]))
    }
}
