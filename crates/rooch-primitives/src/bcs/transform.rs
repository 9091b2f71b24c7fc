//! Input/output adapters around the canonical encoding.
//!
//! A [`Transform`] lets a logical type accept a richer input shape (a hex
//! string, a bech32 address, base64 text) and return a normalized output
//! shape, while the bytes on the wire stay the primitive form. Adapters are
//! pure: `validate` runs before anything is written, `to_wire` converts the
//! input, and `from_wire` normalizes a decoded value.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::{Decode, Encode};
use crate::address::RoochAddress;
use crate::util::{BcsReader, BcsWriter};
use crate::PrimitivesError;

/// An encode/decode adapter pair attached to one logical type.
pub trait Transform {
    /// The primitive type actually written to the wire.
    type Wire: Encode + Decode;
    /// What callers may pass in.
    type Input: ?Sized;
    /// What decoding hands back.
    type Output;

    /// Validation hook; rejects with `InvalidValue` before any byte is emitted.
    fn validate(input: &Self::Input) -> Result<(), PrimitivesError>;

    /// Convert validated input into the wire value.
    fn to_wire(input: &Self::Input) -> Result<Self::Wire, PrimitivesError>;

    /// Normalize a decoded wire value.
    fn from_wire(wire: Self::Wire) -> Self::Output;
}

/// Validate `input`, then append its wire encoding to `writer`.
pub fn encode_into<T: Transform>(
    input: &T::Input,
    writer: &mut BcsWriter,
) -> Result<(), PrimitivesError> {
    T::validate(input)?;
    T::to_wire(input)?.encode(writer)
}

/// Validate and encode `input` into a fresh byte vector.
pub fn encode_with<T: Transform>(input: &T::Input) -> Result<Vec<u8>, PrimitivesError> {
    let mut writer = BcsWriter::new();
    encode_into::<T>(input, &mut writer)?;
    Ok(writer.into_bytes())
}

/// Read one wire value from `reader` and normalize it.
pub fn read_with<T: Transform>(reader: &mut BcsReader<'_>) -> Result<T::Output, PrimitivesError> {
    Ok(T::from_wire(T::Wire::decode(reader)?))
}

/// Decode bytes that hold exactly one wire value and normalize it.
pub fn decode_with<T: Transform>(bytes: &[u8]) -> Result<T::Output, PrimitivesError> {
    Ok(T::from_wire(super::from_bytes::<T::Wire>(bytes)?))
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Address text in, normalized `0x` 64-hex text out, 32 raw bytes on the wire.
///
/// Accepts hex with or without `0x` (short forms are left-padded) and the
/// bech32m `rooch1...` form.
pub struct AddressTransform;

impl Transform for AddressTransform {
    type Wire = RoochAddress;
    type Input = str;
    type Output = String;

    fn validate(input: &str) -> Result<(), PrimitivesError> {
        input
            .parse::<RoochAddress>()
            .map(|_| ())
            .map_err(|e| PrimitivesError::InvalidValue(format!("address '{}': {}", input, e)))
    }

    fn to_wire(input: &str) -> Result<RoochAddress, PrimitivesError> {
        input
            .parse::<RoochAddress>()
            .map_err(|e| PrimitivesError::InvalidValue(format!("address '{}': {}", input, e)))
    }

    fn from_wire(wire: RoochAddress) -> String {
        wire.to_hex()
    }
}

// ---------------------------------------------------------------------------
// Byte vectors
// ---------------------------------------------------------------------------

/// The accepted input shapes for a byte vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BytesInput {
    Raw(Vec<u8>),
    /// Hex text, `0x` prefix optional.
    Hex(String),
    /// Standard base64 text.
    Base64(String),
}

impl BytesInput {
    fn to_bytes(&self) -> Result<Vec<u8>, PrimitivesError> {
        match self {
            BytesInput::Raw(bytes) => Ok(bytes.clone()),
            BytesInput::Hex(text) => {
                let digits = text.strip_prefix("0x").unwrap_or(text);
                hex::decode(digits)
                    .map_err(|e| PrimitivesError::InvalidValue(format!("hex '{}': {}", text, e)))
            }
            BytesInput::Base64(text) => BASE64
                .decode(text)
                .map_err(|e| PrimitivesError::InvalidValue(format!("base64 '{}': {}", text, e))),
        }
    }
}

impl From<Vec<u8>> for BytesInput {
    fn from(bytes: Vec<u8>) -> Self {
        BytesInput::Raw(bytes)
    }
}

impl From<&[u8]> for BytesInput {
    fn from(bytes: &[u8]) -> Self {
        BytesInput::Raw(bytes.to_vec())
    }
}

/// Raw bytes, hex or base64 in, `0x` hex out, length-prefixed bytes on the wire.
pub struct BytesTransform;

impl Transform for BytesTransform {
    type Wire = Vec<u8>;
    type Input = BytesInput;
    type Output = String;

    fn validate(input: &BytesInput) -> Result<(), PrimitivesError> {
        input.to_bytes().map(|_| ())
    }

    fn to_wire(input: &BytesInput) -> Result<Vec<u8>, PrimitivesError> {
        input.to_bytes()
    }

    fn from_wire(wire: Vec<u8>) -> String {
        format!("0x{}", hex::encode(wire))
    }
}
