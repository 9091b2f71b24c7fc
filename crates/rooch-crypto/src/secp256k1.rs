//! Secp256k1 keys.
//!
//! One secret scalar serves two purposes:
//!
//! - ECDSA: [`Secp256k1Keypair::sign`] signs `SHA-256(message)` and returns the
//!   64-byte compact `r || s` form with low S. [`Keypair::public_key`] is the
//!   33-byte compressed ECDSA key.
//! - Taproot: [`Secp256k1Keypair::schnorr_public_key`] is the 32-byte x-only
//!   key. After the BIP-86 key-path tweak it becomes the P2TR output key that
//!   [`Keypair::bitcoin_address`] encodes.
//!
//! The Rooch address of a Secp256k1 key is the Rooch address of its Taproot
//! Bitcoin address.

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar};
use rand::rngs::OsRng;
use rooch_primitives::address::{BitcoinAddress, RoochAddress};
use rooch_primitives::hash::sha256;

use crate::derive::{derive_secp256k1_secret, mnemonic_to_seed, parse_secp256k1_path};
use crate::keypair::{check_canary, Keypair, PublicKey, SecretKeyInput, SignatureScheme};
use crate::secret_key::{encode_secret_key, resolve_secret};
use crate::CryptoError;

/// Default derivation path for the first Secp256k1 (Taproot) account.
pub const DEFAULT_SECP256K1_DERIVATION_PATH: &str = "m/86'/0'/0'/0/0";

/// A compressed Secp256k1 ECDSA public key with its Taproot output key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    inner: VerifyingKey,
    taproot_output_key: [u8; 32],
}

impl Secp256k1PublicKey {
    /// Byte length of a compressed public key.
    pub const LENGTH: usize = 33;

    /// Parse a SEC1 public key (compressed or uncompressed).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Self::from_verifying_key(inner)
    }

    fn from_verifying_key(inner: VerifyingKey) -> Result<Self, CryptoError> {
        let compressed = inner.to_encoded_point(true);
        let mut x_only = [0u8; 32];
        x_only.copy_from_slice(&compressed.as_bytes()[1..33]);
        let taproot_output_key = taproot_tweak(&x_only)?;
        Ok(Secp256k1PublicKey {
            inner,
            taproot_output_key,
        })
    }

    /// 33-byte compressed SEC1 encoding.
    pub fn to_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out.copy_from_slice(self.inner.to_encoded_point(true).as_bytes());
        out
    }

    /// The x-only key (BIP-340) for this point.
    pub fn x_only(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.to_compressed()[1..]);
        out
    }

    /// The tweaked Taproot output key for a key-path-only spend.
    pub fn taproot_output_key(&self) -> [u8; 32] {
        self.taproot_output_key
    }

    /// The P2TR Bitcoin address for this key.
    pub fn bitcoin_address(&self) -> BitcoinAddress {
        BitcoinAddress::p2tr(self.taproot_output_key)
    }
}

impl PublicKey for Secp256k1PublicKey {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Secp256k1
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.to_compressed().to_vec()
    }

    /// Verify a compact signature over `SHA-256(message)`. High-S signatures
    /// are rejected.
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match Signature::from_slice(signature) {
            Ok(sig) => self.inner.verify(message, &sig).is_ok(),
            Err(_) => false,
        }
    }

    fn rooch_address(&self) -> RoochAddress {
        self.bitcoin_address().to_rooch_address()
    }
}

/// A Secp256k1 signing key.
#[derive(Clone, Debug)]
pub struct Secp256k1Keypair {
    inner: SigningKey,
    public_key: Secp256k1PublicKey,
}

impl Secp256k1Keypair {
    /// Generate a new keypair from the OS random number generator.
    pub fn generate() -> Self {
        // Redraw in the negligible case that the taproot tweak fails.
        loop {
            if let Ok(keypair) = Self::from_signing_key(SigningKey::random(&mut OsRng)) {
                return keypair;
            }
        }
    }

    fn from_signing_key(inner: SigningKey) -> Result<Self, CryptoError> {
        let public_key = Secp256k1PublicKey::from_verifying_key(*inner.verifying_key())?;
        Ok(Secp256k1Keypair { inner, public_key })
    }

    /// Import a secret from raw bytes or `roochsecretkey1...` text.
    ///
    /// Unless `skip_validation` is set, the imported key signs a canary
    /// message and must verify it against its own public key.
    pub fn from_secret_key<'a>(
        input: impl Into<SecretKeyInput<'a>>,
        skip_validation: bool,
    ) -> Result<Self, CryptoError> {
        let secret = resolve_secret(input.into(), SignatureScheme::Secp256k1)?;
        let inner = SigningKey::from_slice(&secret[..])
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        let keypair = Self::from_signing_key(inner)?;
        if !skip_validation {
            check_canary(&keypair)?;
        }
        Ok(keypair)
    }

    /// Derive a keypair from a BIP-39 mnemonic along a BIP-32 path.
    ///
    /// The path must have the form `m/86'/0'/{account}'/{change}/{index}`:
    /// the first three levels hardened, the last two not.
    pub fn derive_keypair(mnemonic: &str, path: &str) -> Result<Self, CryptoError> {
        let indices = parse_secp256k1_path(path)?;
        let seed = mnemonic_to_seed(mnemonic)?;
        let secret = derive_secp256k1_secret(&seed[..], &indices)?;
        let inner = SigningKey::from_slice(&secret[..])
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        Self::from_signing_key(inner)
    }

    /// The BIP-340 x-only public key. Use this (not the ECDSA key) when a
    /// Bitcoin address is needed.
    pub fn schnorr_public_key(&self) -> Result<[u8; 32], CryptoError> {
        let schnorr = k256::schnorr::SigningKey::from_bytes(&self.inner.to_bytes())
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&schnorr.verifying_key().to_bytes());
        Ok(out)
    }

    /// The raw 32-byte secret.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }
}

impl Keypair for Secp256k1Keypair {
    type PublicKey = Secp256k1PublicKey;

    fn public_key(&self) -> Secp256k1PublicKey {
        self.public_key.clone()
    }

    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Secp256k1
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let signature: Signature = self
            .inner
            .try_sign(message)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_bytes().to_vec())
    }

    fn export_secret_key(&self) -> Result<String, CryptoError> {
        encode_secret_key(SignatureScheme::Secp256k1, &self.secret_key_bytes())
    }

    fn bitcoin_address(&self) -> Option<BitcoinAddress> {
        Some(self.public_key().bitcoin_address())
    }
}

/// BIP-340 tagged hash: `SHA-256(SHA-256(tag) || SHA-256(tag) || data)`.
fn tagged_hash(tag: &[u8], data: &[u8]) -> [u8; 32] {
    let tag_hash = sha256(tag);
    let mut preimage = Vec::with_capacity(64 + data.len());
    preimage.extend_from_slice(&tag_hash);
    preimage.extend_from_slice(&tag_hash);
    preimage.extend_from_slice(data);
    sha256(&preimage)
}

/// BIP-86 key-path tweak: `Q = lift_x(P) + H_TapTweak(P) * G`, returning x(Q).
fn taproot_tweak(x_only: &[u8; 32]) -> Result<[u8; 32], CryptoError> {
    let mut even = [0u8; 33];
    even[0] = 0x02;
    even[1..].copy_from_slice(x_only);
    let internal = k256::PublicKey::from_sec1_bytes(&even)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    let tweak = tagged_hash(b"TapTweak", x_only);
    let tweak: Option<Scalar> = Scalar::from_repr(FieldBytes::from(tweak)).into();
    let tweak = tweak
        .ok_or_else(|| CryptoError::InvalidPublicKey("taproot tweak out of range".into()))?;

    let output = internal.to_projective() + ProjectivePoint::GENERATOR * tweak;
    let encoded = AffinePoint::from(output).to_encoded_point(true);
    let bytes = encoded.as_bytes();
    if bytes.len() != 33 {
        return Err(CryptoError::InvalidPublicKey(
            "taproot output key is the point at infinity".into(),
        ));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes[1..]);
    Ok(out)
}
