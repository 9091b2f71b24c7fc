//! Deterministic object identifiers.
//!
//! An object id is a path of 32-byte segments; the ids derived here are
//! single-segment. Hashing uses SHA3-256 over the canonical struct tag string
//! (see [`StructTag::to_canonical_string`]).

use std::fmt;
use std::str::FromStr;

use crate::address::RoochAddress;
use crate::bcs::{Decode, Encode};
use crate::hash::sha3_256;
use crate::type_tag::StructTag;
use crate::util::{BcsReader, BcsWriter};
use crate::PrimitivesError;

/// An object identifier: one or more 32-byte path segments.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(Vec<RoochAddress>);

impl ObjectId {
    /// Build an id from its path segments.
    pub fn new(path: Vec<RoochAddress>) -> Self {
        ObjectId(path)
    }

    /// The id of a named (singleton) object of type `tag`.
    pub fn named(tag: &StructTag) -> Self {
        let digest = sha3_256(tag.to_canonical_string().as_bytes());
        ObjectId(vec![RoochAddress::new(digest)])
    }

    /// The id of the object of type `tag` owned by the account `address`.
    pub fn account_named(address: &RoochAddress, tag: &StructTag) -> Self {
        let canonical = tag.to_canonical_string();
        let mut preimage = Vec::with_capacity(RoochAddress::LENGTH + canonical.len());
        preimage.extend_from_slice(address.as_bytes());
        preimage.extend_from_slice(canonical.as_bytes());
        ObjectId(vec![RoochAddress::new(sha3_256(&preimage))])
    }

    /// The path segments, outermost first.
    pub fn path(&self) -> &[RoochAddress] {
        &self.0
    }

    /// Parse `0x`-prefixed hex whose length is a multiple of 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self, PrimitivesError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)?;
        if bytes.is_empty() || bytes.len() % RoochAddress::LENGTH != 0 {
            return Err(PrimitivesError::InvalidLength {
                expected: RoochAddress::LENGTH,
                got: bytes.len(),
            });
        }
        let path = bytes
            .chunks(RoochAddress::LENGTH)
            .map(RoochAddress::from_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ObjectId(path))
    }

    /// `0x` followed by the hex of every segment.
    pub fn to_hex(&self) -> String {
        let mut out = String::from("0x");
        for segment in &self.0 {
            out.push_str(&segment.to_canonical_string());
        }
        out
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::from_hex(s)
    }
}

impl Encode for ObjectId {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.0.encode(writer)
    }
}

impl Decode for ObjectId {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(ObjectId(Vec::decode(reader)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;
    use crate::type_tag::parse_struct_tag;

    #[test]
    fn test_named_object_id_hashes_canonical_string() {
        let tag = parse_struct_tag("0x3::timestamp::Timestamp").unwrap();
        let expected = sha3_256(
            format!("{:064x}::timestamp::Timestamp", 3).as_bytes(),
        );
        assert_eq!(ObjectId::named(&tag).to_hex(), format!("0x{}", hex::encode(expected)));
    }

    #[test]
    fn test_named_object_id_independent_of_input_spelling() {
        let a = parse_struct_tag("0x3::timestamp::Timestamp").unwrap();
        let b = parse_struct_tag(
            "0x0000000000000000000000000000000000000000000000000000000000000003::timestamp::Timestamp",
        )
        .unwrap();
        assert_eq!(ObjectId::named(&a), ObjectId::named(&b));
    }

    #[test]
    fn test_account_named_differs_from_named() {
        let tag = parse_struct_tag("0x3::coin_store::CoinStore<0x3::gas_coin::RGas>").unwrap();
        let named = ObjectId::named(&tag);
        let owned = ObjectId::account_named(&RoochAddress::ONE, &tag);
        let other = ObjectId::account_named(&RoochAddress::TWO, &tag);
        assert_ne!(named, owned);
        assert_ne!(owned, other);
    }

    #[test]
    fn test_hex_roundtrip_and_encoding() {
        let tag = parse_struct_tag("0x3::timestamp::Timestamp").unwrap();
        let id = ObjectId::named(&tag);
        assert_eq!(ObjectId::from_hex(&id.to_hex()).unwrap(), id);

        let bytes = bcs::to_bytes(&id).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 1);
        assert_eq!(bcs::from_bytes::<ObjectId>(&bytes).unwrap(), id);
    }

    #[test]
    fn test_from_hex_rejects_partial_segment() {
        assert!(ObjectId::from_hex("0x1234").is_err());
        assert!(ObjectId::from_hex("0x").is_err());
    }
}
