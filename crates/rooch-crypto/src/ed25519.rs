//! Ed25519 keys.
//!
//! Signatures are plain Ed25519 over the message bytes (no pre-hash). The
//! account address is `BLAKE2b-256(0x00 || public key)`.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rooch_primitives::address::RoochAddress;
use rooch_primitives::hash::blake2b256;

use crate::derive::{derive_ed25519_secret, mnemonic_to_seed, parse_ed25519_path};
use crate::keypair::{check_canary, Keypair, PublicKey, SecretKeyInput, SignatureScheme};
use crate::secret_key::{encode_secret_key, resolve_secret};
use crate::CryptoError;

/// Default derivation path for the first Ed25519 account.
pub const DEFAULT_ED25519_DERIVATION_PATH: &str = "m/44'/784'/0'/0'/0'";

/// An Ed25519 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ed25519PublicKey {
    inner: VerifyingKey,
}

impl Ed25519PublicKey {
    /// Byte length of an Ed25519 public key.
    pub const LENGTH: usize = 32;

    /// Parse 32 raw public key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; Self::LENGTH] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidPublicKey(format!(
                "expected {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            ))
        })?;
        let inner = VerifyingKey::from_bytes(&arr)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Ed25519PublicKey { inner })
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        self.inner.as_bytes()
    }
}

impl PublicKey for Ed25519PublicKey {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(bytes) = <[u8; 64]>::try_from(signature) else {
            return false;
        };
        let signature = Signature::from_bytes(&bytes);
        self.inner.verify_strict(message, &signature).is_ok()
    }

    fn rooch_address(&self) -> RoochAddress {
        RoochAddress::new(blake2b256(&[
            &[SignatureScheme::Ed25519.flag()],
            self.inner.as_bytes(),
        ]))
    }
}

/// An Ed25519 signing key.
#[derive(Clone, Debug)]
pub struct Ed25519Keypair {
    inner: SigningKey,
}

impl Ed25519Keypair {
    /// Generate a new keypair from the OS random number generator.
    pub fn generate() -> Self {
        Ed25519Keypair {
            inner: SigningKey::generate(&mut OsRng),
        }
    }

    /// Import a secret from raw bytes or `roochsecretkey1...` text.
    ///
    /// Unless `skip_validation` is set, the imported key signs a canary
    /// message and must verify it against its own public key.
    pub fn from_secret_key<'a>(
        input: impl Into<SecretKeyInput<'a>>,
        skip_validation: bool,
    ) -> Result<Self, CryptoError> {
        let secret = resolve_secret(input.into(), SignatureScheme::Ed25519)?;
        let keypair = Ed25519Keypair {
            inner: SigningKey::from_bytes(&secret),
        };
        if !skip_validation {
            check_canary(&keypair)?;
        }
        Ok(keypair)
    }

    /// Derive a keypair from a BIP-39 mnemonic along a SLIP-0010 path.
    ///
    /// The path must have the form `m/44'/784'/{account}'/{change}'/{index}'`;
    /// every level is hardened.
    pub fn derive_keypair(mnemonic: &str, path: &str) -> Result<Self, CryptoError> {
        let indices = parse_ed25519_path(path)?;
        let seed = mnemonic_to_seed(mnemonic)?;
        let secret = derive_ed25519_secret(&seed[..], &indices);
        Ok(Ed25519Keypair {
            inner: SigningKey::from_bytes(&secret),
        })
    }

    /// The raw 32-byte secret.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }
}

impl Keypair for Ed25519Keypair {
    type PublicKey = Ed25519PublicKey;

    fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            inner: self.inner.verifying_key(),
        }
    }

    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(self.inner.sign(message).to_bytes().to_vec())
    }

    fn export_secret_key(&self) -> Result<String, CryptoError> {
        encode_secret_key(SignatureScheme::Ed25519, &self.inner.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032 test 1.
    const RFC8032_SECRET: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const RFC8032_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const RFC8032_SIG_EMPTY: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    fn rfc_keypair() -> Ed25519Keypair {
        let secret = hex::decode(RFC8032_SECRET).unwrap();
        Ed25519Keypair::from_secret_key(secret.as_slice(), false).unwrap()
    }

    #[test]
    fn test_rfc8032_vector() {
        let kp = rfc_keypair();
        assert_eq!(hex::encode(kp.public_key().to_bytes()), RFC8032_PUBLIC);
        assert_eq!(hex::encode(kp.sign(b"").unwrap()), RFC8032_SIG_EMPTY);
    }

    #[test]
    fn test_address_is_blake2b_of_flagged_key() {
        let kp = rfc_keypair();
        let pk = hex::decode(RFC8032_PUBLIC).unwrap();
        let expected = blake2b256(&[&[0u8], &pk]);
        assert_eq!(kp.rooch_address().as_bytes(), &expected);
        assert_eq!(kp.public_key().to_flagged_bytes()[0], 0);
        assert!(kp.bitcoin_address().is_none());
    }

    #[test]
    fn test_sign_verify_and_tamper() {
        let kp = Ed25519Keypair::generate();
        let pk = kp.public_key();
        let sig = kp.sign(b"hello rooch").unwrap();
        assert_eq!(sig.len(), 64);
        assert!(pk.verify(b"hello rooch", &sig));
        assert!(!pk.verify(b"hello rooc", &sig));
        assert!(!pk.verify(b"hello rooch", &sig[..63]));
    }

    #[test]
    fn test_export_import_roundtrip() {
        let kp = Ed25519Keypair::generate();
        let text = kp.export_secret_key().unwrap();
        let imported = Ed25519Keypair::from_secret_key(text.as_str(), false).unwrap();
        assert_eq!(imported.public_key(), kp.public_key());
    }

    #[test]
    fn test_public_key_from_bytes() {
        let kp = rfc_keypair();
        let pk = Ed25519PublicKey::from_bytes(&kp.public_key().to_bytes()).unwrap();
        assert_eq!(pk, kp.public_key());
        assert!(Ed25519PublicKey::from_bytes(&[0u8; 31]).is_err());
    }
}
