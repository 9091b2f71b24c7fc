//! Account addresses.
//!
//! A [`RoochAddress`] is a fixed 32-byte identifier. Its canonical text form
//! is `0x` followed by 64 lower-case hex digits; short hex (`0x3`) and the
//! bech32m form (`rooch1...`) are accepted on input. Bitcoin-style addresses
//! live in [`bitcoin`] and map onto a Rooch address by hashing.

pub mod bitcoin;

use std::fmt;
use std::str::FromStr;

use bech32::{Bech32m, Hrp};

use crate::bcs::{Decode, Encode};
use crate::util::{BcsReader, BcsWriter};
use crate::PrimitivesError;

pub use bitcoin::{BitcoinAddress, BitcoinNetwork};

/// Human-readable part of the bech32m address form.
pub const ROOCH_HRP: &str = "rooch";

/// A 32-byte Rooch account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RoochAddress([u8; RoochAddress::LENGTH]);

impl RoochAddress {
    /// Byte length of every address.
    pub const LENGTH: usize = 32;

    pub const ZERO: RoochAddress = RoochAddress::from_u8(0);
    /// `0x1`, the Move standard library.
    pub const ONE: RoochAddress = RoochAddress::from_u8(1);
    /// `0x2`, the MoveOS standard library.
    pub const TWO: RoochAddress = RoochAddress::from_u8(2);
    /// `0x3`, the Rooch framework.
    pub const THREE: RoochAddress = RoochAddress::from_u8(3);

    const fn from_u8(v: u8) -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        bytes[Self::LENGTH - 1] = v;
        RoochAddress(bytes)
    }

    /// Wrap 32 raw bytes.
    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        RoochAddress(bytes)
    }

    /// Build from a byte slice that must be exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; Self::LENGTH] =
            bytes
                .try_into()
                .map_err(|_| PrimitivesError::InvalidLength {
                    expected: Self::LENGTH,
                    got: bytes.len(),
                })?;
        Ok(RoochAddress(arr))
    }

    /// Parse hex text, with or without `0x`, left-padding short forms.
    ///
    /// Mixed case is accepted; the parsed bytes are identical either way.
    pub fn from_hex(s: &str) -> Result<Self, PrimitivesError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() || digits.len() > Self::LENGTH * 2 {
            return Err(PrimitivesError::InvalidHex(format!(
                "address must have 1 to {} hex digits, got {}",
                Self::LENGTH * 2,
                digits.len()
            )));
        }
        let padded = format!("{:0>width$}", digits, width = Self::LENGTH * 2);
        let mut bytes = [0u8; Self::LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)?;
        Ok(RoochAddress(bytes))
    }

    /// Parse the bech32m form `rooch1...`.
    pub fn from_bech32(s: &str) -> Result<Self, PrimitivesError> {
        let checked = bech32::primitives::decode::CheckedHrpstring::new::<Bech32m>(s)
            .map_err(|e| PrimitivesError::InvalidBech32(e.to_string()))?;
        if checked.hrp().as_str() != ROOCH_HRP {
            return Err(PrimitivesError::InvalidBech32(format!(
                "expected hrp '{}', got '{}'",
                ROOCH_HRP,
                checked.hrp()
            )));
        }
        let bytes: Vec<u8> = checked.byte_iter().collect();
        Self::from_bytes(&bytes)
    }

    /// Return the raw bytes.
    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    /// Return a copy of the raw bytes.
    pub fn to_bytes(&self) -> [u8; Self::LENGTH] {
        self.0
    }

    /// `0x` followed by 64 lower-case hex digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// 64 lower-case hex digits without prefix, as used in canonical type strings.
    pub fn to_canonical_string(&self) -> String {
        hex::encode(self.0)
    }

    /// `0x`-prefixed hex with leading zero digits removed (`0x3`).
    pub fn short_hex(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }

    /// Encode as bech32m with the `rooch` prefix.
    pub fn to_bech32(&self) -> Result<String, PrimitivesError> {
        let hrp = Hrp::parse(ROOCH_HRP).map_err(|e| PrimitivesError::InvalidBech32(e.to_string()))?;
        bech32::encode::<Bech32m>(hrp, &self.0)
            .map_err(|e| PrimitivesError::InvalidBech32(e.to_string()))
    }
}

impl FromStr for RoochAddress {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("rooch1") {
            Self::from_bech32(s)
        } else {
            Self::from_hex(s)
        }
    }
}

impl fmt::Display for RoochAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for RoochAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoochAddress({})", self.to_hex())
    }
}

impl From<[u8; 32]> for RoochAddress {
    fn from(bytes: [u8; 32]) -> Self {
        RoochAddress(bytes)
    }
}

impl Encode for RoochAddress {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        writer.write_bytes(&self.0);
        Ok(())
    }
}

impl Decode for RoochAddress {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(RoochAddress(reader.read_array()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;

    #[test]
    fn test_short_and_full_hex_parse_equal() {
        let short = RoochAddress::from_hex("0x3").unwrap();
        let full = RoochAddress::from_hex(
            "0x0000000000000000000000000000000000000000000000000000000000000003",
        )
        .unwrap();
        assert_eq!(short, full);
        assert_eq!(short, RoochAddress::THREE);
        assert_eq!(short.short_hex(), "0x3");
        assert_eq!(RoochAddress::ZERO.short_hex(), "0x0");
    }

    #[test]
    fn test_display_is_zero_padded_lower_case() {
        let addr = RoochAddress::from_hex("0xABCDEF").unwrap();
        assert_eq!(
            addr.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000abcdef"
        );
    }

    #[test]
    fn test_mixed_case_encodes_identically() {
        let a = RoochAddress::from_hex("0xaBcD").unwrap();
        let b = RoochAddress::from_hex("0xABCD").unwrap();
        let c = RoochAddress::from_hex("abcd").unwrap();
        assert_eq!(bcs::to_bytes(&a).unwrap(), bcs::to_bytes(&b).unwrap());
        assert_eq!(bcs::to_bytes(&a).unwrap(), bcs::to_bytes(&c).unwrap());
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(RoochAddress::from_hex("0x").is_err());
        assert!(RoochAddress::from_hex("0xzz").is_err());
        assert!(RoochAddress::from_hex(&format!("0x{}", "1".repeat(65))).is_err());
    }

    #[test]
    fn test_bech32_roundtrip() {
        let addr = RoochAddress::from_hex("0x42").unwrap();
        let text = addr.to_bech32().unwrap();
        assert!(text.starts_with("rooch1"));
        assert_eq!(RoochAddress::from_bech32(&text).unwrap(), addr);
        assert_eq!(text.parse::<RoochAddress>().unwrap(), addr);
    }

    #[test]
    fn test_bech32_wrong_hrp_rejected() {
        let hrp = Hrp::parse("other").unwrap();
        let text = bech32::encode::<Bech32m>(hrp, &[0u8; 32]).unwrap();
        assert!(RoochAddress::from_bech32(&text).is_err());
    }

    #[test]
    fn test_encoding_is_raw_32_bytes() {
        let bytes = bcs::to_bytes(&RoochAddress::ONE).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 1);
        assert_eq!(bcs::from_bytes::<RoochAddress>(&bytes).unwrap(), RoochAddress::ONE);
        assert!(bcs::from_bytes::<RoochAddress>(&bytes[..31]).is_err());
    }
}
