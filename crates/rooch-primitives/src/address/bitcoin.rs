//! Taproot Bitcoin addresses.
//!
//! Rooch derives Secp256k1 accounts from the key's BIP-86 P2TR address. The
//! on-chain raw form is `[2, 1] || output_key`: payload type 2 (witness
//! program), witness version 1, then the 32-byte tweaked x-only key. The
//! Rooch address is the BLAKE2b-256 of that raw form.

use bech32::{segwit, Hrp};

use super::RoochAddress;
use crate::hash::blake2b256;
use crate::PrimitivesError;

const WITNESS_PROGRAM_TYPE: u8 = 2;

/// The Bitcoin network an address is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitcoinNetwork {
    #[default]
    Bitcoin,
    Testnet,
    Signet,
    Regtest,
}

impl BitcoinNetwork {
    fn bech32_hrp(&self) -> Hrp {
        match self {
            BitcoinNetwork::Bitcoin => bech32::hrp::BC,
            BitcoinNetwork::Testnet | BitcoinNetwork::Signet => bech32::hrp::TB,
            BitcoinNetwork::Regtest => bech32::hrp::BCRT,
        }
    }
}

/// A key-path-only Taproot (P2TR) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitcoinAddress {
    output_key: [u8; 32],
}

impl BitcoinAddress {
    /// Address for a tweaked x-only output key.
    pub fn p2tr(output_key: [u8; 32]) -> Self {
        BitcoinAddress { output_key }
    }

    /// The tweaked output key.
    pub fn output_key(&self) -> &[u8; 32] {
        &self.output_key
    }

    /// Raw on-chain form: payload type, witness version, program.
    pub fn to_bytes(&self) -> Vec<u8> {
        [&[WITNESS_PROGRAM_TYPE, segwit::VERSION_1.to_u8()][..], &self.output_key[..]].concat()
    }

    /// The Rooch account this Bitcoin address controls.
    pub fn to_rooch_address(&self) -> RoochAddress {
        RoochAddress::new(blake2b256(&[&self.to_bytes()]))
    }

    /// Render as bech32m for the given network.
    pub fn format(&self, network: BitcoinNetwork) -> Result<String, PrimitivesError> {
        segwit::encode(network.bech32_hrp(), segwit::VERSION_1, &self.output_key)
            .map_err(|e| PrimitivesError::InvalidBech32(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p2tr_known_address() {
        // BIP-86 first receive address for the all-"abandon" mnemonic.
        let key: [u8; 32] =
            hex::decode("a60869f0dbcf1dc659c9cecbaf8050135ea9e8cdc487053f1dc6880949dc684c")
                .unwrap()
                .try_into()
                .unwrap();
        let addr = BitcoinAddress::p2tr(key);
        assert_eq!(
            addr.format(BitcoinNetwork::Bitcoin).unwrap(),
            "bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr"
        );
        assert!(addr
            .format(BitcoinNetwork::Regtest)
            .unwrap()
            .starts_with("bcrt1p"));
        assert!(addr.format(BitcoinNetwork::Signet).unwrap().starts_with("tb1p"));
    }

    #[test]
    fn test_raw_form_layout() {
        let addr = BitcoinAddress::p2tr([0x22; 32]);
        let raw = addr.to_bytes();
        assert_eq!(raw.len(), 34);
        assert_eq!(&raw[..2], &[2, 1]);
        assert_eq!(&raw[2..], addr.output_key());
        assert_eq!(
            addr.to_rooch_address(),
            RoochAddress::new(blake2b256(&[&raw]))
        );
    }
}
