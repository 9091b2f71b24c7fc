/// Rooch SDK - Canonical serialization, addresses, type tags and hashing.
///
/// This crate provides the foundational building blocks for the Rooch SDK:
/// - Hash functions (SHA-256, SHA-256d, SHA3-256, BLAKE2b-256, HMAC-SHA512)
/// - Canonical binary serialization (BCS) with input/output transform adapters
/// - 32-byte Rooch addresses (hex and bech32m) and Bitcoin addresses
/// - Move type tags, struct tags and their parser
/// - Deterministic object identifiers

pub mod hash;
pub mod util;
pub mod bcs;
pub mod address;
pub mod type_tag;
pub mod object_id;

mod error;
pub use error::PrimitivesError;
