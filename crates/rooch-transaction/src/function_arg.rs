//! Typed entry-function arguments and their canonical encoding.

use rooch_primitives::address::RoochAddress;
use rooch_primitives::bcs::transform::{encode_with, AddressTransform, BytesInput, BytesTransform};
use rooch_primitives::bcs::{self, U256};
use rooch_primitives::object_id::ObjectId;

use crate::TransactionError;

/// One argument to an entry function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionArg {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Address(RoochAddress),
    /// A Move `String` (UTF-8 bytes, length-prefixed).
    String(String),
    /// A `vector<u8>`.
    Bytes(Vec<u8>),
    ObjectId(ObjectId),
    VecAddress(Vec<RoochAddress>),
    VecString(Vec<String>),
    VecU64(Vec<u64>),
    /// Bytes that are already canonically encoded.
    Encoded(Vec<u8>),
}

impl FunctionArg {
    /// Canonical encoding of the argument.
    pub fn encode(&self) -> Result<Vec<u8>, TransactionError> {
        let bytes = match self {
            FunctionArg::Bool(v) => bcs::to_bytes(v)?,
            FunctionArg::U8(v) => bcs::to_bytes(v)?,
            FunctionArg::U16(v) => bcs::to_bytes(v)?,
            FunctionArg::U32(v) => bcs::to_bytes(v)?,
            FunctionArg::U64(v) => bcs::to_bytes(v)?,
            FunctionArg::U128(v) => bcs::to_bytes(v)?,
            FunctionArg::U256(v) => bcs::to_bytes(v)?,
            FunctionArg::Address(v) => bcs::to_bytes(v)?,
            FunctionArg::String(v) => bcs::to_bytes(v)?,
            FunctionArg::Bytes(v) => bcs::to_bytes(v)?,
            FunctionArg::ObjectId(v) => bcs::to_bytes(v)?,
            FunctionArg::VecAddress(v) => bcs::to_bytes(v)?,
            FunctionArg::VecString(v) => bcs::to_bytes(v)?,
            FunctionArg::VecU64(v) => bcs::to_bytes(v)?,
            FunctionArg::Encoded(v) => v.clone(),
        };
        Ok(bytes)
    }

    /// An address given as text (short hex, full hex or `rooch1...`).
    pub fn address_text(text: &str) -> Result<Self, TransactionError> {
        Ok(FunctionArg::Encoded(encode_with::<AddressTransform>(text)?))
    }

    /// A `vector<u8>` given as raw bytes, hex or base64.
    pub fn bytes_input(input: impl Into<BytesInput>) -> Result<Self, TransactionError> {
        Ok(FunctionArg::Encoded(encode_with::<BytesTransform>(
            &input.into(),
        )?))
    }
}

macro_rules! impl_from {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for FunctionArg {
            fn from(v: $ty) -> Self {
                FunctionArg::$variant(v)
            }
        }
    };
}

impl_from!(bool, Bool);
impl_from!(u8, U8);
impl_from!(u16, U16);
impl_from!(u32, U32);
impl_from!(u64, U64);
impl_from!(u128, U128);
impl_from!(U256, U256);
impl_from!(RoochAddress, Address);
impl_from!(String, String);
impl_from!(Vec<u8>, Bytes);
impl_from!(ObjectId, ObjectId);
impl_from!(Vec<RoochAddress>, VecAddress);
impl_from!(Vec<String>, VecString);

impl From<&str> for FunctionArg {
    fn from(v: &str) -> Self {
        FunctionArg::String(v.to_string())
    }
}
