//! Byte cursors and integer prefixes.
//!
//! Provides the ULEB128 length/variant prefix used by the canonical encoding,
//! the Bitcoin `VarInt` used when framing signed messages, and the cursor-based
//! `BcsReader` / `BcsWriter` pair every encoder in the SDK is built on.

use crate::PrimitivesError;

/// Largest sequence length or variant index the canonical encoding accepts.
pub const MAX_SEQUENCE_LENGTH: u64 = (1 << 31) - 1;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// Bitcoin CompactSize integer (1, 3, 5 or 9 bytes).
///
/// Only used to frame Bitcoin signed messages; the canonical encoding itself
/// uses ULEB128.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Encoded size in bytes.
    pub fn length(&self) -> usize {
        if self.0 < 0xfd {
            1
        } else if self.0 <= 0xffff {
            3
        } else if self.0 <= 0xffff_ffff {
            5
        } else {
            9
        }
    }

    /// Marker byte (if any) followed by the little-endian value.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        let mut buf = Vec::with_capacity(self.length());
        if v < 0xfd {
            buf.push(v as u8);
        } else if v <= 0xffff {
            buf.push(0xfd);
            buf.extend_from_slice(&(v as u16).to_le_bytes());
        } else if v <= 0xffff_ffff {
            buf.push(0xfe);
            buf.extend_from_slice(&(v as u32).to_le_bytes());
        } else {
            buf.push(0xff);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// ULEB128
// ---------------------------------------------------------------------------

/// Append the ULEB128 encoding of `value` to `buf`.
pub fn write_uleb128(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

// ---------------------------------------------------------------------------
// BcsReader
// ---------------------------------------------------------------------------

/// A cursor-based reader over canonically encoded bytes.
///
/// Wraps a byte slice and maintains a read position. Every read checks the
/// remaining length first, so a truncated buffer surfaces as
/// `MalformedEncoding` instead of a panic.
pub struct BcsReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BcsReader<'a> {
    /// Start reading at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        BcsReader { data, pos: 0 }
    }

    /// Read exactly `n` bytes from the current position.
    ///
    /// # Returns
    /// A slice of `n` bytes, or `MalformedEncoding` when fewer remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if n > self.remaining() {
            return Err(PrimitivesError::MalformedEncoding(format!(
                "need {} bytes at offset {}, only {} remain",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u128.
    pub fn read_u128_le(&mut self) -> Result<u128, PrimitivesError> {
        Ok(u128::from_le_bytes(self.read_array()?))
    }

    /// Read a ULEB128 value bounded by [`MAX_SEQUENCE_LENGTH`].
    ///
    /// Non-minimal encodings (a trailing zero continuation group) are
    /// rejected so each value has exactly one accepted byte form.
    pub fn read_uleb128(&mut self) -> Result<u64, PrimitivesError> {
        let mut value: u64 = 0;
        for shift in (0..32).step_by(7) {
            let byte = self.read_u8()?;
            let digit = (byte & 0x7f) as u64;
            value |= digit << shift;
            if byte & 0x80 == 0 {
                if shift > 0 && digit == 0 {
                    return Err(PrimitivesError::MalformedEncoding(
                        "non-canonical ULEB128 encoding".into(),
                    ));
                }
                if value > MAX_SEQUENCE_LENGTH {
                    return Err(PrimitivesError::MalformedEncoding(format!(
                        "length {} exceeds maximum {}",
                        value, MAX_SEQUENCE_LENGTH
                    )));
                }
                return Ok(value);
            }
        }
        Err(PrimitivesError::MalformedEncoding(
            "ULEB128 value overflows u32".into(),
        ))
    }

    /// Read a length prefix and check it against the bytes still available.
    pub fn read_length(&mut self) -> Result<usize, PrimitivesError> {
        let len = self.read_uleb128()? as usize;
        if len > self.remaining() {
            return Err(PrimitivesError::MalformedEncoding(format!(
                "declared length {} exceeds remaining {} bytes",
                len,
                self.remaining()
            )));
        }
        Ok(len)
    }

    /// Return the number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

// ---------------------------------------------------------------------------
// BcsWriter
// ---------------------------------------------------------------------------

/// A buffer-based writer for canonically encoded bytes.
pub struct BcsWriter {
    buf: Vec<u8>,
}

impl BcsWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        BcsWriter { buf: Vec::new() }
    }

    /// Append raw bytes with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Write a little-endian u16.
    pub fn write_u16_le(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Write a little-endian u32.
    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Write a little-endian u64.
    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Write a little-endian u128.
    pub fn write_u128_le(&mut self, val: u128) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Write a ULEB128 value (length prefix or variant index).
    pub fn write_uleb128(&mut self, val: u64) {
        write_uleb128(&mut self.buf, val);
    }

    /// Write a length prefix, rejecting lengths the decoder would refuse.
    pub fn write_length(&mut self, len: usize) -> Result<(), PrimitivesError> {
        if len as u64 > MAX_SEQUENCE_LENGTH {
            return Err(PrimitivesError::InvalidValue(format!(
                "sequence length {} exceeds maximum {}",
                len, MAX_SEQUENCE_LENGTH
            )));
        }
        self.write_uleb128(len as u64);
        Ok(())
    }

    /// Finish writing and take the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Return a reference to the accumulated bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl Default for BcsWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- VarInt encoding (Bitcoin compact size) --

    #[test]
    fn test_varint_to_bytes() {
        let cases: Vec<(u64, Vec<u8>)> = vec![
            (0, vec![0x00]),
            (0x18, vec![0x18]),
            (252, vec![0xfc]),
            (253, vec![0xfd, 0xfd, 0x00]),
            (65535, vec![0xfd, 0xff, 0xff]),
            (65536, vec![0xfe, 0x00, 0x00, 0x01, 0x00]),
            (4294967296, vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]),
        ];
        for (value, expected) in cases {
            let vi = VarInt(value);
            assert_eq!(vi.to_bytes(), expected, "VarInt({})", value);
            assert_eq!(vi.length(), expected.len(), "length of VarInt({})", value);
        }
    }

    // -- ULEB128 --

    #[test]
    fn test_uleb128_encoding() {
        let cases: Vec<(u64, Vec<u8>)> = vec![
            (0, vec![0x00]),
            (1, vec![0x01]),
            (127, vec![0x7f]),
            (128, vec![0x80, 0x01]),
            (300, vec![0xac, 0x02]),
            (16384, vec![0x80, 0x80, 0x01]),
        ];
        for (value, expected) in cases {
            let mut buf = Vec::new();
            write_uleb128(&mut buf, value);
            assert_eq!(buf, expected, "uleb128({})", value);
            let mut reader = BcsReader::new(&buf);
            assert_eq!(reader.read_uleb128().unwrap(), value);
            assert_eq!(reader.remaining(), 0);
        }
    }

    #[test]
    fn test_uleb128_rejects_non_canonical() {
        let mut reader = BcsReader::new(&[0x80, 0x00]);
        assert!(matches!(
            reader.read_uleb128(),
            Err(PrimitivesError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_uleb128_rejects_overflow() {
        let mut reader = BcsReader::new(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x01]);
        assert!(reader.read_uleb128().is_err());
        let mut reader = BcsReader::new(&[0x80, 0x80, 0x80, 0x80, 0x08]);
        assert!(reader.read_uleb128().is_err());
    }

    // -- BcsReader / BcsWriter --

    #[test]
    fn test_reader_writer_roundtrip() {
        let mut writer = BcsWriter::new();
        writer.write_u8(0x42);
        writer.write_u16_le(0x1234);
        writer.write_u32_le(0xDEADBEEF);
        writer.write_u64_le(0x0102030405060708);
        writer.write_u128_le(u128::MAX - 1);
        writer.write_length(5).unwrap();
        writer.write_bytes(b"hello");

        let data = writer.into_bytes();
        let mut reader = BcsReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_u64_le().unwrap(), 0x0102030405060708);
        assert_eq!(reader.read_u128_le().unwrap(), u128::MAX - 1);
        let len = reader.read_length().unwrap();
        assert_eq!(reader.read_bytes(len).unwrap(), b"hello");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_eof_is_malformed() {
        let mut reader = BcsReader::new(&[0x01]);
        assert!(reader.read_u8().is_ok());
        assert!(matches!(
            reader.read_u8(),
            Err(PrimitivesError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_length_exceeding_buffer_is_malformed() {
        // Declares 10 bytes but only 2 follow.
        let mut reader = BcsReader::new(&[0x0a, 0x01, 0x02]);
        assert!(matches!(
            reader.read_length(),
            Err(PrimitivesError::MalformedEncoding(_))
        ));
    }
}
