//! Transaction assembly: Built → Prepared → Signed.
//!
//! A [`Transaction`] starts with only an action. [`Transaction::prepare`]
//! fixes sender, sequence number and chain id so the data can be hashed;
//! signing (or attaching an externally produced authenticator) moves it to
//! Signed, the only state that can be encoded for submission. Transitions
//! run forward only; calling an operation in the wrong state fails with
//! `InvalidState` and leaves the transaction unchanged.

use rooch_crypto::{Keypair, Secp256k1Keypair};
use rooch_message::SigningEnvelope;
use rooch_primitives::address::RoochAddress;
use rooch_primitives::bcs::{Decode, Encode};
use rooch_primitives::util::{BcsReader, BcsWriter};
use rooch_primitives::PrimitivesError;

use crate::action::MoveAction;
use crate::authenticator::Authenticator;
use crate::data::{TransactionData, DEFAULT_MAX_GAS_AMOUNT};
use crate::TransactionError;

/// Where a transaction is in its lifecycle, with the data each state owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionState {
    Built {
        action: MoveAction,
    },
    Prepared {
        data: TransactionData,
    },
    Signed {
        data: TransactionData,
        authenticator: Authenticator,
    },
}

impl TransactionState {
    pub fn name(&self) -> &'static str {
        match self {
            TransactionState::Built { .. } => "Built",
            TransactionState::Prepared { .. } => "Prepared",
            TransactionState::Signed { .. } => "Signed",
        }
    }
}

/// A transaction under assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    state: TransactionState,
    max_gas_amount: u64,
}

impl Transaction {
    /// Start a transaction for `action` with the default gas limit.
    pub fn new(action: impl Into<MoveAction>) -> Self {
        Transaction {
            state: TransactionState::Built {
                action: action.into(),
            },
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
        }
    }

    pub fn state(&self) -> &TransactionState {
        &self.state
    }

    pub fn max_gas_amount(&self) -> u64 {
        self.max_gas_amount
    }

    /// Set the gas limit. Only allowed while Built.
    pub fn set_max_gas_amount(&mut self, max_gas_amount: u64) -> Result<(), TransactionError> {
        self.require_built("set max gas of")?;
        self.max_gas_amount = max_gas_amount;
        Ok(())
    }

    /// Builder form of [`Self::set_max_gas_amount`].
    pub fn with_max_gas_amount(mut self, max_gas_amount: u64) -> Result<Self, TransactionError> {
        self.set_max_gas_amount(max_gas_amount)?;
        Ok(self)
    }

    /// The action, in any state.
    pub fn action(&self) -> &MoveAction {
        match &self.state {
            TransactionState::Built { action } => action,
            TransactionState::Prepared { data } | TransactionState::Signed { data, .. } => {
                &data.action
            }
        }
    }

    /// The transaction data once Prepared.
    pub fn data(&self) -> Option<&TransactionData> {
        match &self.state {
            TransactionState::Built { .. } => None,
            TransactionState::Prepared { data } | TransactionState::Signed { data, .. } => {
                Some(data)
            }
        }
    }

    /// The authenticator once Signed.
    pub fn authenticator(&self) -> Option<&Authenticator> {
        match &self.state {
            TransactionState::Signed { authenticator, .. } => Some(authenticator),
            _ => None,
        }
    }

    /// Built → Prepared.
    pub fn prepare(
        &mut self,
        sender: RoochAddress,
        sequence_number: u64,
        chain_id: u64,
    ) -> Result<(), TransactionError> {
        let TransactionState::Built { action } = &self.state else {
            return Err(self.invalid("prepare"));
        };
        let data = TransactionData::new(
            sender,
            sequence_number,
            chain_id,
            self.max_gas_amount,
            action.clone(),
        );
        self.state = TransactionState::Prepared { data };
        Ok(())
    }

    /// Hash of the transaction data. Valid once Prepared.
    pub fn hash_data(&self) -> Result<[u8; 32], TransactionError> {
        let data = self.data().ok_or_else(|| self.invalid("hash"))?;
        Ok(data.hash()?)
    }

    /// Prepared → Signed, signing through `envelope` with a session authenticator.
    pub fn sign<K: Keypair>(
        &mut self,
        keypair: &K,
        envelope: &SigningEnvelope,
    ) -> Result<(), TransactionError> {
        let tx_hash = self.prepared_hash("sign")?;
        let authenticator = Authenticator::session(keypair, &tx_hash, envelope)?;
        self.attach_authenticator(authenticator)
    }

    /// Prepared → Signed, using the Bitcoin auth validator.
    pub fn sign_bitcoin(
        &mut self,
        keypair: &Secp256k1Keypair,
    ) -> Result<(), TransactionError> {
        let tx_hash = self.prepared_hash("sign")?;
        let authenticator = Authenticator::bitcoin(keypair, &tx_hash)?;
        self.attach_authenticator(authenticator)
    }

    /// Prepared → Signed with an authenticator built elsewhere (for
    /// example from a WebAuthn assertion over [`Self::hash_data`]).
    pub fn attach_authenticator(
        &mut self,
        authenticator: Authenticator,
    ) -> Result<(), TransactionError> {
        let TransactionState::Prepared { data } = &self.state else {
            return Err(self.invalid("attach an authenticator to"));
        };
        self.state = TransactionState::Signed {
            data: data.clone(),
            authenticator,
        };
        Ok(())
    }

    /// The signed pair. Valid once Signed.
    pub fn signed(&self) -> Result<SignedTransaction, TransactionError> {
        match &self.state {
            TransactionState::Signed {
                data,
                authenticator,
            } => Ok(SignedTransaction {
                data: data.clone(),
                authenticator: authenticator.clone(),
            }),
            _ => Err(self.invalid("encode")),
        }
    }

    /// Wire bytes: encoded data followed by encoded authenticator.
    pub fn encode(&self) -> Result<Vec<u8>, TransactionError> {
        self.signed()?.encode()
    }

    /// `0x`-prefixed hex of [`Self::encode`], as submitted over RPC.
    pub fn to_hex(&self) -> Result<String, TransactionError> {
        Ok(format!("0x{}", hex::encode(self.encode()?)))
    }

    fn prepared_hash(&self, operation: &'static str) -> Result<[u8; 32], TransactionError> {
        match &self.state {
            TransactionState::Prepared { data } => Ok(data.hash()?),
            _ => Err(self.invalid(operation)),
        }
    }

    fn require_built(&self, operation: &'static str) -> Result<(), TransactionError> {
        match self.state {
            TransactionState::Built { .. } => Ok(()),
            _ => Err(self.invalid(operation)),
        }
    }

    fn invalid(&self, operation: &'static str) -> TransactionError {
        TransactionError::InvalidState {
            operation,
            state: self.state.name(),
        }
    }
}

/// Transaction data together with its authenticator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub data: TransactionData,
    pub authenticator: Authenticator,
}

impl SignedTransaction {
    pub fn tx_hash(&self) -> Result<[u8; 32], TransactionError> {
        Ok(self.data.hash()?)
    }

    /// Canonical encoding: data then authenticator.
    pub fn encode(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(rooch_primitives::bcs::to_bytes(self)?)
    }

    /// Split wire bytes back into data and authenticator.
    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        Ok(rooch_primitives::bcs::from_bytes(bytes)?)
    }

    /// Parse `0x`-prefixed (or bare) hex wire bytes.
    pub fn from_hex(text: &str) -> Result<Self, TransactionError> {
        let digits = text.strip_prefix("0x").unwrap_or(text);
        let bytes = hex::decode(digits).map_err(PrimitivesError::from)?;
        Self::decode(&bytes)
    }

    pub fn to_hex(&self) -> Result<String, TransactionError> {
        Ok(format!("0x{}", hex::encode(self.encode()?)))
    }

    /// Check the authenticator against the data's hash.
    pub fn verify(&self) -> Result<bool, TransactionError> {
        self.authenticator.verify(&self.tx_hash()?)
    }
}

impl Encode for SignedTransaction {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.data.encode(writer)?;
        self.authenticator.encode(writer)
    }
}

impl Decode for SignedTransaction {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(SignedTransaction {
            data: TransactionData::decode(reader)?,
            authenticator: Authenticator::decode(reader)?,
        })
    }
}
