//! The envelope abstraction and its tagged sum type.
//!
//! An envelope turns a 32-byte transaction hash into the bytes a key
//! actually signs. The envelope's tag byte travels with the signature so a
//! verifier can replay the same transformation.

use std::fmt;

use rooch_primitives::bcs::Decode;
use rooch_primitives::util::BcsReader;
use rooch_primitives::PrimitivesError;
use tracing::trace;

use crate::bitcoin::BitcoinMessageEnvelope;
use crate::webauthn::WebauthnEnvelope;
use crate::MessageError;

/// Stable numeric tag of an envelope kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EnvelopeType {
    /// The transaction hash is signed as-is.
    RawTxHash = 0x00,
    /// The hash is framed as a Bitcoin signed message.
    BitcoinMessageV0 = 0x01,
    /// The hash is the challenge of a WebAuthn assertion.
    WebAuthnV0 = 0x02,
}

impl EnvelopeType {
    /// The tag byte.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Look up an envelope type by tag byte.
    pub fn from_u8(tag: u8) -> Result<Self, MessageError> {
        match tag {
            0x00 => Ok(EnvelopeType::RawTxHash),
            0x01 => Ok(EnvelopeType::BitcoinMessageV0),
            0x02 => Ok(EnvelopeType::WebAuthnV0),
            other => Err(MessageError::UnknownEnvelope(other)),
        }
    }
}

impl fmt::Display for EnvelopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeType::RawTxHash => f.write_str("RawTxHash"),
            EnvelopeType::BitcoinMessageV0 => f.write_str("BitcoinMessageV0"),
            EnvelopeType::WebAuthnV0 => f.write_str("WebAuthnV0"),
        }
    }
}

/// Transforms a transaction hash into signable bytes.
pub trait Envelope {
    /// The envelope's tag.
    fn envelope_type(&self) -> EnvelopeType;

    /// The bytes passed to `Keypair::sign` for `tx_hash`.
    fn build_message(&self, tx_hash: &[u8; 32]) -> Result<Vec<u8>, MessageError>;

    /// The value the signature primitive ultimately commits to, for local
    /// verification and diagnostics.
    fn compute_digest(&self, tx_hash: &[u8; 32]) -> Result<Vec<u8>, MessageError>;

    /// Extra bytes a verifier needs to replay the transformation. Empty for
    /// envelopes that are fully determined by the hash.
    fn envelope_data(&self) -> Result<Vec<u8>, MessageError> {
        Ok(Vec::new())
    }
}

/// Identity envelope: the signed message is the transaction hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTxHashEnvelope;

impl Envelope for RawTxHashEnvelope {
    fn envelope_type(&self) -> EnvelopeType {
        EnvelopeType::RawTxHash
    }

    fn build_message(&self, tx_hash: &[u8; 32]) -> Result<Vec<u8>, MessageError> {
        Ok(tx_hash.to_vec())
    }

    fn compute_digest(&self, tx_hash: &[u8; 32]) -> Result<Vec<u8>, MessageError> {
        Ok(tx_hash.to_vec())
    }
}

/// Any envelope, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SigningEnvelope {
    /// See [`RawTxHashEnvelope`].
    #[default]
    RawTxHash,
    /// See [`BitcoinMessageEnvelope`].
    BitcoinMessage(BitcoinMessageEnvelope),
    /// See [`WebauthnEnvelope`].
    WebAuthn(WebauthnEnvelope),
}

impl SigningEnvelope {
    fn as_envelope(&self) -> &dyn Envelope {
        match self {
            SigningEnvelope::RawTxHash => &RawTxHashEnvelope,
            SigningEnvelope::BitcoinMessage(envelope) => envelope,
            SigningEnvelope::WebAuthn(envelope) => envelope,
        }
    }

    /// Serialize as the tag byte followed by the envelope data.
    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        let mut out = vec![self.envelope_type().to_u8()];
        out.extend_from_slice(&self.envelope_data()?);
        Ok(out)
    }

    /// Parse a complete tag-plus-data encoding.
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        let mut reader = BcsReader::new(bytes);
        let envelope = Self::read(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(PrimitivesError::MalformedEncoding(format!(
                "{} trailing bytes after envelope",
                reader.remaining()
            ))
            .into());
        }
        Ok(envelope)
    }

    /// Read one envelope from `reader`, leaving any following bytes.
    pub fn read(reader: &mut BcsReader<'_>) -> Result<Self, MessageError> {
        match EnvelopeType::from_u8(reader.read_u8()?)? {
            EnvelopeType::RawTxHash => Ok(SigningEnvelope::RawTxHash),
            EnvelopeType::BitcoinMessageV0 => {
                Ok(SigningEnvelope::BitcoinMessage(BitcoinMessageEnvelope))
            }
            EnvelopeType::WebAuthnV0 => {
                let authenticator_data = Vec::<u8>::decode(reader)?;
                let client_data_json = Vec::<u8>::decode(reader)?;
                Ok(SigningEnvelope::WebAuthn(WebauthnEnvelope::new(
                    authenticator_data,
                    client_data_json,
                )))
            }
        }
    }
}

impl Envelope for SigningEnvelope {
    fn envelope_type(&self) -> EnvelopeType {
        self.as_envelope().envelope_type()
    }

    fn build_message(&self, tx_hash: &[u8; 32]) -> Result<Vec<u8>, MessageError> {
        trace!(envelope = %self.envelope_type(), "building signing message");
        self.as_envelope().build_message(tx_hash)
    }

    fn compute_digest(&self, tx_hash: &[u8; 32]) -> Result<Vec<u8>, MessageError> {
        self.as_envelope().compute_digest(tx_hash)
    }

    fn envelope_data(&self) -> Result<Vec<u8>, MessageError> {
        self.as_envelope().envelope_data()
    }
}

impl From<BitcoinMessageEnvelope> for SigningEnvelope {
    fn from(envelope: BitcoinMessageEnvelope) -> Self {
        SigningEnvelope::BitcoinMessage(envelope)
    }
}

impl From<WebauthnEnvelope> for SigningEnvelope {
    fn from(envelope: WebauthnEnvelope) -> Self {
        SigningEnvelope::WebAuthn(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_envelope_is_identity() {
        let hash = [0xab; 32];
        let envelope = SigningEnvelope::RawTxHash;
        assert_eq!(envelope.build_message(&hash).unwrap(), hash.to_vec());
        assert_eq!(envelope.compute_digest(&hash).unwrap(), hash.to_vec());
        assert_eq!(envelope.encode().unwrap(), vec![0x00]);
    }

    #[test]
    fn test_encode_decode_each_kind() {
        let envelopes = [
            SigningEnvelope::RawTxHash,
            SigningEnvelope::BitcoinMessage(BitcoinMessageEnvelope),
            SigningEnvelope::WebAuthn(WebauthnEnvelope::new(vec![1, 2, 3], b"{}".to_vec())),
        ];
        for envelope in envelopes {
            let bytes = envelope.encode().unwrap();
            assert_eq!(bytes[0], envelope.envelope_type().to_u8());
            assert_eq!(SigningEnvelope::decode(&bytes).unwrap(), envelope);
        }
    }

    #[test]
    fn test_webauthn_encoding_layout() {
        let envelope = SigningEnvelope::from(WebauthnEnvelope::new(vec![0xaa, 0xbb], b"x".to_vec()));
        assert_eq!(
            envelope.encode().unwrap(),
            vec![0x02, 0x02, 0xaa, 0xbb, 0x01, b'x']
        );
    }

    #[test]
    fn test_decode_rejects_unknown_and_trailing() {
        assert!(matches!(
            SigningEnvelope::decode(&[0x07]),
            Err(MessageError::UnknownEnvelope(7))
        ));
        assert!(matches!(
            SigningEnvelope::decode(&[0x00, 0x00]),
            Err(MessageError::Primitives(PrimitivesError::MalformedEncoding(_)))
        ));
        assert!(SigningEnvelope::decode(&[]).is_err());
    }
}
