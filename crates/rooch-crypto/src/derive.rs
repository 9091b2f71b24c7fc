//! BIP-39 mnemonics and hierarchical key derivation.
//!
//! Ed25519 keys use SLIP-0010 (hardened-only) along
//! `m/44'/784'/{account}'/{change}'/{index}'`. Secp256k1 keys use BIP-32
//! along the BIP-86 Taproot path `m/86'/0'/{account}'/{change}/{index}`.

use std::sync::LazyLock;

use bip39::Mnemonic;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::{Field, PrimeField};
use k256::{FieldBytes, ProjectivePoint, Scalar};
use rand::rngs::OsRng;
use rand::RngCore;
use regex::Regex;
use rooch_primitives::hash::sha512_hmac;
use zeroize::Zeroizing;

use crate::CryptoError;

/// Offset marking a hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

static RE_ED25519_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^m/44'/784'/[0-9]+'/[0-9]+'/[0-9]+'$").unwrap());

static RE_SECP256K1_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^m/86'/0'/[0-9]+'/[0-9]+/[0-9]+$").unwrap());

// ---- Mnemonics ----

/// Generate a fresh 12-word English mnemonic.
pub fn generate_mnemonic() -> Result<String, CryptoError> {
    let mut entropy = Zeroizing::new([0u8; 16]);
    OsRng.fill_bytes(&mut entropy[..]);
    let mnemonic = Mnemonic::from_entropy(&entropy[..])
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;
    Ok(mnemonic.to_string())
}

/// Check a mnemonic's word list and checksum.
pub fn validate_mnemonic(mnemonic: &str) -> bool {
    Mnemonic::parse_normalized(mnemonic).is_ok()
}

/// Convert a mnemonic into its 64-byte BIP-39 seed (empty passphrase).
pub fn mnemonic_to_seed(mnemonic: &str) -> Result<Zeroizing<[u8; 64]>, CryptoError> {
    let parsed = Mnemonic::parse_normalized(mnemonic)
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(parsed.to_seed("")))
}

// ---- Paths ----

/// Parse an Ed25519 derivation path into hardened child indices.
pub fn parse_ed25519_path(path: &str) -> Result<Vec<u32>, CryptoError> {
    if !RE_ED25519_PATH.is_match(path) {
        return Err(CryptoError::InvalidDerivationPath(format!(
            "expected m/44'/784'/{{account}}'/{{change}}'/{{index}}', got {path}"
        )));
    }
    parse_levels(path)
}

/// Parse a Secp256k1 derivation path into child indices.
pub fn parse_secp256k1_path(path: &str) -> Result<Vec<u32>, CryptoError> {
    if !RE_SECP256K1_PATH.is_match(path) {
        return Err(CryptoError::InvalidDerivationPath(format!(
            "expected m/86'/0'/{{account}}'/{{change}}/{{index}}, got {path}"
        )));
    }
    parse_levels(path)
}

fn parse_levels(path: &str) -> Result<Vec<u32>, CryptoError> {
    path.split('/')
        .skip(1)
        .map(|level| {
            let (digits, hardened) = match level.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (level, false),
            };
            let index: u32 = digits
                .parse()
                .ok()
                .filter(|i| *i < HARDENED_OFFSET)
                .ok_or_else(|| {
                    CryptoError::InvalidDerivationPath(format!("index out of range: {level}"))
                })?;
            Ok(if hardened { index + HARDENED_OFFSET } else { index })
        })
        .collect()
}

// ---- Derivation ----

/// SLIP-0010 Ed25519 derivation. Every index is treated as hardened.
pub fn derive_ed25519_secret(seed: &[u8], indices: &[u32]) -> Zeroizing<[u8; 32]> {
    let mut node = Zeroizing::new(sha512_hmac(b"ed25519 seed", seed));
    for index in indices {
        let index = index | HARDENED_OFFSET;
        let mut data = Zeroizing::new(Vec::with_capacity(37));
        data.push(0u8);
        data.extend_from_slice(&node[..32]);
        data.extend_from_slice(&index.to_be_bytes());
        node = Zeroizing::new(sha512_hmac(&node[32..], &data));
    }
    let mut secret = Zeroizing::new([0u8; 32]);
    secret.copy_from_slice(&node[..32]);
    secret
}

/// BIP-32 Secp256k1 derivation from a seed.
pub fn derive_secp256k1_secret(
    seed: &[u8],
    indices: &[u32],
) -> Result<Zeroizing<[u8; 32]>, CryptoError> {
    let master = Zeroizing::new(sha512_hmac(b"Bitcoin seed", seed));
    let mut key = scalar_from_bytes(&master[..32])?;
    let mut chain_code = Zeroizing::new([0u8; 32]);
    chain_code.copy_from_slice(&master[32..]);

    for &index in indices {
        let mut data = Zeroizing::new(Vec::with_capacity(37));
        if index >= HARDENED_OFFSET {
            data.push(0u8);
            data.extend_from_slice(&key.to_repr());
        } else {
            let point = (ProjectivePoint::GENERATOR * key).to_affine();
            data.extend_from_slice(point.to_encoded_point(true).as_bytes());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let node = Zeroizing::new(sha512_hmac(&chain_code[..], &data));
        let tweak = scalar_from_bytes(&node[..32])?;
        key += tweak;
        if bool::from(key.is_zero()) {
            return Err(CryptoError::InvalidSecretKey(format!(
                "derived key at index {index} is zero"
            )));
        }
        chain_code.copy_from_slice(&node[32..]);
    }

    let mut secret = Zeroizing::new([0u8; 32]);
    secret.copy_from_slice(&key.to_repr());
    Ok(secret)
}

fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar, CryptoError> {
    let repr = FieldBytes::clone_from_slice(bytes);
    let scalar: Option<Scalar> = Scalar::from_repr(repr).into();
    scalar
        .filter(|s| !bool::from(s.is_zero()))
        .ok_or_else(|| CryptoError::InvalidSecretKey("derived key out of range".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VECTOR_1_SEED: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn test_slip10_vector_1() {
        let seed = hex::decode(VECTOR_1_SEED).unwrap();
        assert_eq!(
            hex::encode(*derive_ed25519_secret(&seed, &[])),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(*derive_ed25519_secret(&seed, &[HARDENED_OFFSET])),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }

    #[test]
    fn test_bip32_vector_1() {
        let seed = hex::decode(VECTOR_1_SEED).unwrap();
        let cases: [(&[u32], &str); 3] = [
            (&[], "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"),
            (
                &[HARDENED_OFFSET],
                "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea",
            ),
            (
                &[HARDENED_OFFSET, 1],
                "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368",
            ),
        ];
        for (path, expected) in cases {
            let secret = derive_secp256k1_secret(&seed, path).unwrap();
            assert_eq!(hex::encode(*secret), expected);
        }
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(
            parse_ed25519_path("m/44'/784'/0'/0'/1'").unwrap(),
            vec![
                44 + HARDENED_OFFSET,
                784 + HARDENED_OFFSET,
                HARDENED_OFFSET,
                HARDENED_OFFSET,
                1 + HARDENED_OFFSET
            ]
        );
        assert_eq!(
            parse_secp256k1_path("m/86'/0'/2'/0/7").unwrap(),
            vec![86 + HARDENED_OFFSET, HARDENED_OFFSET, 2 + HARDENED_OFFSET, 0, 7]
        );
    }

    #[test]
    fn test_rejects_malformed_paths() {
        for path in [
            "m/44'/784'/0'/0/0",
            "m/44'/0'/0'/0'/0'",
            "44'/784'/0'/0'/0'",
            "m/44'/784'/0'/0'",
            "m/44'/784'/2147483648'/0'/0'",
        ] {
            assert!(
                matches!(parse_ed25519_path(path), Err(CryptoError::InvalidDerivationPath(_))),
                "{path}"
            );
        }
        for path in [
            "m/86'/0'/0'/0'/0'",
            "m/44'/0'/0'/0/0",
            "m/86'/0'/0/0/0",
            "m/86'/0'/0'/0/2147483648",
        ] {
            assert!(
                matches!(parse_secp256k1_path(path), Err(CryptoError::InvalidDerivationPath(_))),
                "{path}"
            );
        }
    }

    #[test]
    fn test_generated_mnemonic_is_valid() {
        let mnemonic = generate_mnemonic().unwrap();
        assert!(!mnemonic.is_empty());
        assert_eq!(mnemonic.split_whitespace().count(), 12);
        assert!(validate_mnemonic(&mnemonic));
        assert_eq!(mnemonic_to_seed(&mnemonic).unwrap().len(), 64);
        assert_ne!(generate_mnemonic().unwrap(), mnemonic);
    }

    #[test]
    fn test_invalid_mnemonic() {
        let bad = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(!validate_mnemonic(bad));
        assert!(matches!(mnemonic_to_seed(bad), Err(CryptoError::InvalidMnemonic(_))));
    }
}
