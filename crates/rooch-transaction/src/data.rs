//! The signed portion of a transaction.

use rooch_primitives::address::RoochAddress;
use rooch_primitives::bcs::{self, Decode, Encode};
use rooch_primitives::hash::sha3_256;
use rooch_primitives::util::{BcsReader, BcsWriter};
use rooch_primitives::PrimitivesError;
use tracing::trace;

use crate::action::MoveAction;

/// Gas limit used when the caller does not set one.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 100_000_000;

/// Sender, replay protection, gas limit and action.
///
/// # Wire format
///
/// | Field           | Encoding        |
/// |-----------------|-----------------|
/// | sender          | 32 bytes        |
/// | sequence_number | u64 LE          |
/// | chain_id        | u64 LE          |
/// | max_gas_amount  | u64 LE          |
/// | action          | `MoveAction`    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionData {
    pub sender: RoochAddress,
    pub sequence_number: u64,
    pub chain_id: u64,
    pub max_gas_amount: u64,
    pub action: MoveAction,
}

impl TransactionData {
    pub fn new(
        sender: RoochAddress,
        sequence_number: u64,
        chain_id: u64,
        max_gas_amount: u64,
        action: MoveAction,
    ) -> Self {
        TransactionData {
            sender,
            sequence_number,
            chain_id,
            max_gas_amount,
            action,
        }
    }

    /// Canonical encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PrimitivesError> {
        bcs::to_bytes(self)
    }

    /// Parse a complete canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        bcs::from_bytes(bytes)
    }

    /// `SHA3-256` of the canonical encoding: the transaction's identity.
    pub fn hash(&self) -> Result<[u8; 32], PrimitivesError> {
        let hash = sha3_256(&self.to_bytes()?);
        trace!(tx_hash = %hex::encode(hash), sender = %self.sender, "hashed transaction data");
        Ok(hash)
    }
}

impl Encode for TransactionData {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.sender.encode(writer)?;
        writer.write_u64_le(self.sequence_number);
        writer.write_u64_le(self.chain_id);
        writer.write_u64_le(self.max_gas_amount);
        self.action.encode(writer)
    }
}

impl Decode for TransactionData {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(TransactionData {
            sender: RoochAddress::decode(reader)?,
            sequence_number: reader.read_u64_le()?,
            chain_id: reader.read_u64_le()?,
            max_gas_amount: reader.read_u64_le()?,
            action: MoveAction::decode(reader)?,
        })
    }
}
