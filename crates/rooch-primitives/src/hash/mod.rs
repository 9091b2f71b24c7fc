//! Hash function primitives for the Rooch SDK.
//!
//! Provides SHA-256, double SHA-256, SHA3-256, BLAKE2b-256 and HMAC-SHA512.
//! SHA3-256 identifies transactions and named objects, BLAKE2b-256 derives
//! account addresses, and SHA-256 frames Bitcoin-style signed messages.

use blake2::digest::consts::U32;
use blake2::Blake2b;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use sha3::Sha3_256;

type Blake2b256 = Blake2b<U32>;

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256 (SHA-256d) hash of the input data.
///
/// This is the digest Bitcoin wallets sign for a framed message.
/// Computes SHA-256(SHA-256(data)).
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte double-SHA-256 digest.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute SHA3-256 hash of the input data.
///
/// Used for transaction hashes and object identifiers.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA3-256 digest.
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute BLAKE2b with a 256-bit output over the concatenation of `parts`.
///
/// Used to derive 32-byte account addresses from scheme-tagged public keys
/// and from Bitcoin address payloads.
///
/// # Arguments
/// * `parts` - Byte slices hashed in order, as if concatenated.
///
/// # Returns
/// A 32-byte BLAKE2b-256 digest.
pub fn blake2b256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Compute HMAC-SHA512 of data using the given key.
///
/// Drives BIP-32 and SLIP-0010 child key derivation.
///
/// # Arguments
/// * `key` - HMAC key.
/// * `data` - Message to authenticate.
///
/// # Returns
/// A 64-byte HMAC-SHA512 digest.
pub fn sha512_hmac(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac =
        <Hmac<Sha512> as Mac>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- SHA-256 ----

    #[test]
    fn test_sha256_known_vectors() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256d_is_two_rounds() {
        let data = b"Rooch Transaction:\n";
        assert_eq!(sha256d(data), sha256(&sha256(data)));
        assert_ne!(sha256d(data), sha256(data));
    }

    // ---- SHA3-256 ----

    #[test]
    fn test_sha3_256_known_vectors() {
        assert_eq!(
            hex::encode(sha3_256(b"")),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
        assert_eq!(
            hex::encode(sha3_256(b"abc")),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    // ---- BLAKE2b-256 ----

    #[test]
    fn test_blake2b256_known_vector() {
        assert_eq!(
            hex::encode(blake2b256(&[b"abc"])),
            "bddd813c634239723171ef3fee98579b94964e3bb1cb3e427262c8c068d52319"
        );
    }

    #[test]
    fn test_blake2b256_parts_concatenate() {
        assert_eq!(blake2b256(&[b"ab", b"c"]), blake2b256(&[b"abc"]));
        assert_eq!(blake2b256(&[b"", b"abc", b""]), blake2b256(&[b"abc"]));
    }

    // ---- HMAC-SHA512 ----

    #[test]
    fn test_sha512_hmac_rfc4231_case_2() {
        let mac = sha512_hmac(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(mac),
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }
}
