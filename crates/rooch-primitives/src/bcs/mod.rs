//! Canonical binary serialization (BCS).
//!
//! Every on-chain value is encoded with one deterministic layout:
//!
//! | Kind                         | Layout                                        |
//! |------------------------------|-----------------------------------------------|
//! | `u8`..`u128`, [`U256`]       | fixed-width little-endian                     |
//! | `bool`                       | one byte, `0` or `1`                          |
//! | byte vectors, strings        | ULEB128 length, then raw (UTF-8) bytes        |
//! | fixed blobs (`[u8; N]`)      | raw bytes, no prefix                          |
//! | structs                      | fields in declaration order, no tags          |
//! | enums                        | ULEB128 variant index, then variant payload   |
//! | `Vec<T>`                     | ULEB128 length, then each element             |
//! | `Option<T>`                  | variant `0` (none) or `1` followed by value   |
//!
//! Decoding a truncated buffer, an over-long length or an unknown variant
//! fails with [`PrimitivesError::MalformedEncoding`]. Encoding runs type
//! validation first and fails with [`PrimitivesError::InvalidValue`] before
//! any byte is emitted.

pub mod transform;

use std::fmt;

use crate::util::{BcsReader, BcsWriter};
use crate::PrimitivesError;

/// A value with a canonical byte encoding.
pub trait Encode {
    /// Append the canonical encoding of `self` to `writer`.
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError>;
}

/// A value that can be reconstructed from its canonical encoding.
pub trait Decode: Sized {
    /// Read one value from `reader`, advancing it past the consumed bytes.
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError>;
}

/// Encode a value into a fresh byte vector.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, PrimitivesError> {
    let mut writer = BcsWriter::new();
    value.encode(&mut writer)?;
    Ok(writer.into_bytes())
}

/// Decode a value that must span the whole input.
///
/// Trailing bytes are rejected, so two different byte strings never decode
/// to the same value.
pub fn from_bytes<T: Decode>(bytes: &[u8]) -> Result<T, PrimitivesError> {
    let mut reader = BcsReader::new(bytes);
    let value = T::decode(&mut reader)?;
    if reader.remaining() != 0 {
        return Err(PrimitivesError::MalformedEncoding(format!(
            "{} trailing bytes after value",
            reader.remaining()
        )));
    }
    Ok(value)
}

/// Read an enum variant index and check it against the number of variants.
pub fn read_variant_index(
    reader: &mut BcsReader<'_>,
    type_name: &str,
    variant_count: u64,
) -> Result<u64, PrimitivesError> {
    let index = reader.read_uleb128()?;
    if index >= variant_count {
        return Err(PrimitivesError::MalformedEncoding(format!(
            "variant index {} out of range for {} ({} variants)",
            index, type_name, variant_count
        )));
    }
    Ok(index)
}

// ---------------------------------------------------------------------------
// Integers
// ---------------------------------------------------------------------------

macro_rules! impl_int {
    ($ty:ty, $write:ident, $read:ident) => {
        impl Encode for $ty {
            fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
                writer.$write(*self);
                Ok(())
            }
        }

        impl Decode for $ty {
            fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
                reader.$read()
            }
        }
    };
}

impl_int!(u8, write_u8, read_u8);
impl_int!(u16, write_u16_le, read_u16_le);
impl_int!(u32, write_u32_le, read_u32_le);
impl_int!(u64, write_u64_le, read_u64_le);
impl_int!(u128, write_u128_le, read_u128_le);

/// A 256-bit unsigned integer, stored as 32 little-endian bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct U256([u8; 32]);

impl U256 {
    pub const ZERO: U256 = U256([0u8; 32]);
    pub const MAX: U256 = U256([0xff; 32]);

    /// Build from 32 little-endian bytes.
    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        U256(bytes)
    }

    /// Return the 32 little-endian bytes.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Parse a base-10 string.
    ///
    /// # Returns
    /// `InvalidValue` for empty input, non-digit characters, or overflow.
    pub fn from_dec_str(s: &str) -> Result<Self, PrimitivesError> {
        if s.is_empty() {
            return Err(PrimitivesError::InvalidValue("empty u256 string".into()));
        }
        let mut bytes = [0u8; 32];
        for ch in s.chars() {
            let digit = ch.to_digit(10).ok_or_else(|| {
                PrimitivesError::InvalidValue(format!("invalid u256 digit '{}'", ch))
            })?;
            let mut carry = digit as u16;
            for byte in bytes.iter_mut() {
                let v = (*byte as u16) * 10 + carry;
                *byte = (v & 0xff) as u8;
                carry = v >> 8;
            }
            if carry != 0 {
                return Err(PrimitivesError::InvalidValue(format!(
                    "u256 overflow: {}",
                    s
                )));
            }
        }
        Ok(U256(bytes))
    }
}

impl From<u64> for U256 {
    fn from(v: u64) -> Self {
        U256::from(v as u128)
    }
}

impl From<u128> for U256 {
    fn from(v: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&v.to_le_bytes());
        U256(bytes)
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        let mut digits = Vec::new();
        while value.iter().any(|b| *b != 0) {
            let mut rem: u16 = 0;
            for byte in value.iter_mut().rev() {
                let v = rem * 256 + *byte as u16;
                *byte = (v / 10) as u8;
                rem = v % 10;
            }
            digits.push(b'0' + rem as u8);
        }
        if digits.is_empty() {
            return f.write_str("0");
        }
        digits.reverse();
        f.write_str(&String::from_utf8_lossy(&digits))
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({})", self)
    }
}

impl Encode for U256 {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        writer.write_bytes(&self.0);
        Ok(())
    }
}

impl Decode for U256 {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(U256(reader.read_array()?))
    }
}

// ---------------------------------------------------------------------------
// Bool, strings, fixed blobs
// ---------------------------------------------------------------------------

impl Encode for bool {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        writer.write_u8(*self as u8);
        Ok(())
    }
}

impl Decode for bool {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(PrimitivesError::MalformedEncoding(format!(
                "invalid bool byte 0x{:02x}",
                b
            ))),
        }
    }
}

impl Encode for str {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        writer.write_length(self.len())?;
        writer.write_bytes(self.as_bytes());
        Ok(())
    }
}

impl Encode for String {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.as_str().encode(writer)
    }
}

impl Decode for String {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        let len = reader.read_length()?;
        let bytes = reader.read_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| PrimitivesError::MalformedEncoding(format!("invalid UTF-8: {}", e)))
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        writer.write_bytes(self);
        Ok(())
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        reader.read_array()
    }
}

// ---------------------------------------------------------------------------
// Sequences and options
// ---------------------------------------------------------------------------

impl<T: Encode> Encode for [T] {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        writer.write_length(self.len())?;
        for item in self {
            item.encode(writer)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.as_slice().encode(writer)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        // Every element consumes at least one byte, so the remaining length
        // bounds the element count.
        let len = reader.read_length()?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::decode(reader)?);
        }
        Ok(items)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        match self {
            None => {
                writer.write_uleb128(0);
                Ok(())
            }
            Some(value) => {
                writer.write_uleb128(1);
                value.encode(writer)
            }
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        match read_variant_index(reader, "Option", 2)? {
            0 => Ok(None),
            _ => Ok(Some(T::decode(reader)?)),
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        (**self).encode(writer)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        (**self).encode(writer)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(Box::new(T::decode(reader)?))
    }
}

impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.0.encode(writer)?;
        self.1.encode(writer)
    }
}

impl<A: Decode, B: Decode> Decode for (A, B) {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok((A::decode(reader)?, B::decode(reader)?))
    }
}
