//! Text encoding of secret keys.
//!
//! An exported secret is bech32 (classic checksum) with the human-readable
//! part `roochsecretkey` over `flag || 32-byte secret`. The flag lets an
//! importer refuse a key that belongs to another scheme before using it.

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use zeroize::Zeroizing;

use crate::keypair::{SecretKeyInput, SignatureScheme};
use crate::CryptoError;

/// Human-readable part of exported secret keys.
pub const SECRET_KEY_HRP: &str = "roochsecretkey";

/// Byte length of a raw secret key.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Encode a secret key as `roochsecretkey1...`.
pub fn encode_secret_key(
    scheme: SignatureScheme,
    secret: &[u8; SECRET_KEY_LENGTH],
) -> Result<String, CryptoError> {
    let hrp = Hrp::parse(SECRET_KEY_HRP)
        .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
    let mut payload = Zeroizing::new(Vec::with_capacity(1 + SECRET_KEY_LENGTH));
    payload.push(scheme.flag());
    payload.extend_from_slice(secret);
    bech32::encode::<Bech32>(hrp, &payload).map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))
}

/// Decode `roochsecretkey1...` text into its scheme and secret.
///
/// Every failure (bad checksum, wrong prefix, unknown flag, wrong length)
/// is reported as `InvalidSecretKey`.
pub fn decode_secret_key(
    text: &str,
) -> Result<(SignatureScheme, Zeroizing<[u8; SECRET_KEY_LENGTH]>), CryptoError> {
    let checked = CheckedHrpstring::new::<Bech32>(text)
        .map_err(|e| CryptoError::InvalidSecretKey(format!("not a bech32 secret key: {}", e)))?;
    if checked.hrp().as_str() != SECRET_KEY_HRP {
        return Err(CryptoError::InvalidSecretKey(format!(
            "expected prefix '{}', got '{}'",
            SECRET_KEY_HRP,
            checked.hrp()
        )));
    }
    let payload = Zeroizing::new(checked.byte_iter().collect::<Vec<u8>>());
    if payload.len() != 1 + SECRET_KEY_LENGTH {
        return Err(CryptoError::InvalidSecretKey(format!(
            "expected {} payload bytes, got {}",
            1 + SECRET_KEY_LENGTH,
            payload.len()
        )));
    }
    let scheme = SignatureScheme::from_flag(payload[0])
        .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
    let mut secret = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
    secret.copy_from_slice(&payload[1..]);
    Ok((scheme, secret))
}

/// Resolve raw or encoded input into secret bytes for the `expected` scheme.
pub(crate) fn resolve_secret(
    input: SecretKeyInput<'_>,
    expected: SignatureScheme,
) -> Result<Zeroizing<[u8; SECRET_KEY_LENGTH]>, CryptoError> {
    match input {
        SecretKeyInput::Bytes(bytes) => {
            if bytes.len() != SECRET_KEY_LENGTH {
                return Err(CryptoError::InvalidSecretKey(format!(
                    "expected {} bytes, got {}",
                    SECRET_KEY_LENGTH,
                    bytes.len()
                )));
            }
            let mut secret = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
            secret.copy_from_slice(bytes);
            Ok(secret)
        }
        SecretKeyInput::Encoded(text) => {
            let (scheme, secret) = decode_secret_key(text)?;
            if scheme != expected {
                return Err(CryptoError::InvalidSecretKey(format!(
                    "expected a {} key, got {}",
                    expected, scheme
                )));
            }
            Ok(secret)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let secret = [0x42u8; 32];
        let text = encode_secret_key(SignatureScheme::Secp256k1, &secret).unwrap();
        assert!(text.starts_with("roochsecretkey1"));
        let (scheme, decoded) = decode_secret_key(&text).unwrap();
        assert_eq!(scheme, SignatureScheme::Secp256k1);
        assert_eq!(*decoded, secret);
    }

    #[test]
    fn test_tampered_text_rejected() {
        let text = encode_secret_key(SignatureScheme::Ed25519, &[7u8; 32]).unwrap();
        let mut chars: Vec<char> = text.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'q' { 'p' } else { 'q' };
        let tampered: String = chars.into_iter().collect();
        assert!(matches!(
            decode_secret_key(&tampered),
            Err(CryptoError::InvalidSecretKey(_))
        ));
    }

    #[test]
    fn test_wrong_prefix_rejected() {
        let hrp = Hrp::parse("rooch").unwrap();
        let mut payload = vec![0u8];
        payload.extend_from_slice(&[1u8; 32]);
        let text = bech32::encode::<Bech32>(hrp, &payload).unwrap();
        assert!(matches!(
            decode_secret_key(&text),
            Err(CryptoError::InvalidSecretKey(_))
        ));
    }

    #[test]
    fn test_scheme_mismatch_rejected() {
        let text = encode_secret_key(SignatureScheme::Secp256k1, &[1u8; 32]).unwrap();
        assert!(matches!(
            resolve_secret(SecretKeyInput::Encoded(&text), SignatureScheme::Ed25519),
            Err(CryptoError::InvalidSecretKey(_))
        ));
    }

    #[test]
    fn test_raw_bytes_length_checked() {
        assert!(resolve_secret(SecretKeyInput::Bytes(&[1u8; 31]), SignatureScheme::Ed25519).is_err());
        assert!(resolve_secret(SecretKeyInput::Bytes(&[1u8; 32]), SignatureScheme::Ed25519).is_ok());
    }
}
