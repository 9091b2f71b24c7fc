//! Move type descriptors.
//!
//! A [`TypeTag`] is either a primitive kind, a `vector<T>`, or a generic
//! [`StructTag`] `address::module::Name<T1, T2>`. Two text forms exist:
//!
//! - `Display` prints `0x`-prefixed, full-width, lower-case addresses
//!   (`0x00..03::gas_coin::RGas`) and is the inverse of [`parse_type_tag`].
//! - [`TypeTag::to_canonical_string`] prints addresses as 64 hex digits with
//!   no prefix. This is the form hashed into object ids and matches what the
//!   chain computes.
//!
//! Both forms put no whitespace anywhere.

mod parser;

use std::fmt;
use std::str::FromStr;

use crate::address::RoochAddress;
use crate::bcs::{read_variant_index, Decode, Encode};
use crate::util::{BcsReader, BcsWriter};
use crate::PrimitivesError;

pub use parser::{parse_struct_tag, parse_type_tag};

/// Maximum nesting of `vector<..>` and struct type parameters.
pub const MAX_TYPE_TAG_DEPTH: usize = 64;

/// A Move identifier: module, struct or function name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Validate and wrap an identifier.
    ///
    /// Identifiers start with a letter or `_`, continue with letters, digits
    /// or `_`, and are never just `_`.
    pub fn new(s: impl Into<String>) -> Result<Self, PrimitivesError> {
        let s = s.into();
        if is_valid_identifier(&s) {
            Ok(Identifier(s))
        } else {
            Err(PrimitivesError::ParseError(format!("invalid identifier '{}'", s)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        Some('_') if s.len() > 1 => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl FromStr for Identifier {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::new(s)
    }
}

impl Encode for Identifier {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.0.encode(writer)
    }
}

impl Decode for Identifier {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        let s = String::decode(reader)?;
        if !is_valid_identifier(&s) {
            return Err(PrimitivesError::MalformedEncoding(format!(
                "invalid identifier '{}'",
                s
            )));
        }
        Ok(Identifier(s))
    }
}

/// A module reference `address::module`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    pub address: RoochAddress,
    pub name: Identifier,
}

impl ModuleId {
    pub fn new(address: RoochAddress, name: Identifier) -> Self {
        ModuleId { address, name }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

impl Encode for ModuleId {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.address.encode(writer)?;
        self.name.encode(writer)
    }
}

impl Decode for ModuleId {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(ModuleId {
            address: RoochAddress::decode(reader)?,
            name: Identifier::decode(reader)?,
        })
    }
}

/// A recursive Move type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

/// A generic struct type `address::module::Name<T..>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructTag {
    pub address: RoochAddress,
    pub module: Identifier,
    pub name: Identifier,
    pub type_params: Vec<TypeTag>,
}

impl StructTag {
    pub fn new(
        address: RoochAddress,
        module: Identifier,
        name: Identifier,
        type_params: Vec<TypeTag>,
    ) -> Self {
        StructTag {
            address,
            module,
            name,
            type_params,
        }
    }

    /// The module this struct is declared in.
    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(self.address, self.module.clone())
    }

    /// Canonical text form: un-prefixed 64-hex address, no whitespace.
    pub fn to_canonical_string(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, true);
        out
    }

    fn write_to(&self, out: &mut String, canonical: bool) {
        if canonical {
            out.push_str(&self.address.to_canonical_string());
        } else {
            out.push_str(&self.address.to_hex());
        }
        out.push_str("::");
        out.push_str(self.module.as_str());
        out.push_str("::");
        out.push_str(self.name.as_str());
        if !self.type_params.is_empty() {
            out.push('<');
            for (i, param) in self.type_params.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                param.write_to(out, canonical);
            }
            out.push('>');
        }
    }
}

impl TypeTag {
    /// Canonical text form: un-prefixed 64-hex addresses, no whitespace.
    pub fn to_canonical_string(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, true);
        out
    }

    fn write_to(&self, out: &mut String, canonical: bool) {
        match self {
            TypeTag::Bool => out.push_str("bool"),
            TypeTag::U8 => out.push_str("u8"),
            TypeTag::U16 => out.push_str("u16"),
            TypeTag::U32 => out.push_str("u32"),
            TypeTag::U64 => out.push_str("u64"),
            TypeTag::U128 => out.push_str("u128"),
            TypeTag::U256 => out.push_str("u256"),
            TypeTag::Address => out.push_str("address"),
            TypeTag::Signer => out.push_str("signer"),
            TypeTag::Vector(inner) => {
                out.push_str("vector<");
                inner.write_to(out, canonical);
                out.push('>');
            }
            TypeTag::Struct(tag) => tag.write_to(out, canonical),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out, false);
        f.write_str(&out)
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out, false);
        f.write_str(&out)
    }
}

impl FromStr for TypeTag {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_tag(s)
    }
}

impl FromStr for StructTag {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_struct_tag(s)
    }
}

impl From<StructTag> for TypeTag {
    fn from(tag: StructTag) -> Self {
        TypeTag::Struct(Box::new(tag))
    }
}

// ---------------------------------------------------------------------------
// Canonical encoding
// ---------------------------------------------------------------------------

// Variant indices follow the on-chain enum declaration order, which appended
// U16, U32 and U256 after the original set.
const TAG_BOOL: u64 = 0;
const TAG_U8: u64 = 1;
const TAG_U64: u64 = 2;
const TAG_U128: u64 = 3;
const TAG_ADDRESS: u64 = 4;
const TAG_SIGNER: u64 = 5;
const TAG_VECTOR: u64 = 6;
const TAG_STRUCT: u64 = 7;
const TAG_U16: u64 = 8;
const TAG_U32: u64 = 9;
const TAG_U256: u64 = 10;
const TYPE_TAG_VARIANTS: u64 = 11;

impl Encode for TypeTag {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        match self {
            TypeTag::Bool => writer.write_uleb128(TAG_BOOL),
            TypeTag::U8 => writer.write_uleb128(TAG_U8),
            TypeTag::U16 => writer.write_uleb128(TAG_U16),
            TypeTag::U32 => writer.write_uleb128(TAG_U32),
            TypeTag::U64 => writer.write_uleb128(TAG_U64),
            TypeTag::U128 => writer.write_uleb128(TAG_U128),
            TypeTag::U256 => writer.write_uleb128(TAG_U256),
            TypeTag::Address => writer.write_uleb128(TAG_ADDRESS),
            TypeTag::Signer => writer.write_uleb128(TAG_SIGNER),
            TypeTag::Vector(inner) => {
                writer.write_uleb128(TAG_VECTOR);
                inner.encode(writer)?;
            }
            TypeTag::Struct(tag) => {
                writer.write_uleb128(TAG_STRUCT);
                tag.encode(writer)?;
            }
        }
        Ok(())
    }
}

impl Encode for StructTag {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.address.encode(writer)?;
        self.module.encode(writer)?;
        self.name.encode(writer)?;
        self.type_params.encode(writer)
    }
}

impl Decode for TypeTag {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        decode_type_tag(reader, 0)
    }
}

impl Decode for StructTag {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        decode_struct_tag(reader, 0)
    }
}

fn decode_type_tag(reader: &mut BcsReader<'_>, depth: usize) -> Result<TypeTag, PrimitivesError> {
    if depth > MAX_TYPE_TAG_DEPTH {
        return Err(PrimitivesError::MalformedEncoding(
            "type tag nesting too deep".into(),
        ));
    }
    let tag = match read_variant_index(reader, "TypeTag", TYPE_TAG_VARIANTS)? {
        TAG_BOOL => TypeTag::Bool,
        TAG_U8 => TypeTag::U8,
        TAG_U64 => TypeTag::U64,
        TAG_U128 => TypeTag::U128,
        TAG_ADDRESS => TypeTag::Address,
        TAG_SIGNER => TypeTag::Signer,
        TAG_VECTOR => TypeTag::Vector(Box::new(decode_type_tag(reader, depth + 1)?)),
        TAG_STRUCT => TypeTag::Struct(Box::new(decode_struct_tag(reader, depth + 1)?)),
        TAG_U16 => TypeTag::U16,
        TAG_U32 => TypeTag::U32,
        _ => TypeTag::U256,
    };
    Ok(tag)
}

fn decode_struct_tag(
    reader: &mut BcsReader<'_>,
    depth: usize,
) -> Result<StructTag, PrimitivesError> {
    let address = RoochAddress::decode(reader)?;
    let module = Identifier::decode(reader)?;
    let name = Identifier::decode(reader)?;
    let count = reader.read_length()?;
    let mut type_params = Vec::with_capacity(count);
    for _ in 0..count {
        type_params.push(decode_type_tag(reader, depth + 1)?);
    }
    Ok(StructTag {
        address,
        module,
        name,
        type_params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;

    fn gas_coin() -> StructTag {
        StructTag::new(
            RoochAddress::THREE,
            Identifier::new("gas_coin").unwrap(),
            Identifier::new("RGas").unwrap(),
            vec![],
        )
    }

    #[test]
    fn test_identifier_validation() {
        assert!(Identifier::new("empty_with_signer").is_ok());
        assert!(Identifier::new("_x").is_ok());
        assert!(Identifier::new("_").is_err());
        assert!(Identifier::new("1abc").is_err());
        assert!(Identifier::new("a-b").is_err());
        assert!(Identifier::new("").is_err());
    }

    #[test]
    fn test_struct_tag_text_forms() {
        let tag = StructTag::new(
            RoochAddress::TWO,
            Identifier::new("object").unwrap(),
            Identifier::new("Object").unwrap(),
            vec![TypeTag::U8, TypeTag::Vector(Box::new(TypeTag::Address))],
        );
        let zeros = "0".repeat(63);
        assert_eq!(
            tag.to_string(),
            format!("0x{}2::object::Object<u8,vector<address>>", zeros)
        );
        assert_eq!(
            tag.to_canonical_string(),
            format!("{}2::object::Object<u8,vector<address>>", zeros)
        );
    }

    #[test]
    fn test_primitive_variant_indices() {
        let cases = [
            (TypeTag::Bool, 0u8),
            (TypeTag::U8, 1),
            (TypeTag::U64, 2),
            (TypeTag::U128, 3),
            (TypeTag::Address, 4),
            (TypeTag::Signer, 5),
            (TypeTag::U16, 8),
            (TypeTag::U32, 9),
            (TypeTag::U256, 10),
        ];
        for (tag, index) in cases {
            assert_eq!(bcs::to_bytes(&tag).unwrap(), vec![index], "{}", tag);
        }
    }

    #[test]
    fn test_struct_tag_encoding_layout() {
        let tag = TypeTag::from(gas_coin());
        let bytes = bcs::to_bytes(&tag).unwrap();
        assert_eq!(bytes[0], 7);
        assert_eq!(&bytes[1..33], RoochAddress::THREE.as_bytes());
        assert_eq!(bytes[33], 8);
        assert_eq!(&bytes[34..42], b"gas_coin");
        assert_eq!(bytes[42], 4);
        assert_eq!(&bytes[43..47], b"RGas");
        assert_eq!(bytes[47], 0);
        assert_eq!(bcs::from_bytes::<TypeTag>(&bytes).unwrap(), tag);
    }

    #[test]
    fn test_unknown_variant_is_malformed() {
        assert!(matches!(
            bcs::from_bytes::<TypeTag>(&[11]),
            Err(PrimitivesError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_excessive_nesting_is_malformed() {
        let bytes = vec![6u8; MAX_TYPE_TAG_DEPTH + 2];
        assert!(bcs::from_bytes::<TypeTag>(&bytes).is_err());
    }
}
