//! WebAuthn assertion envelope.
//!
//! A passkey signs inside the authenticator, so this envelope never produces
//! a message for a local keypair. It carries the assertion's
//! `authenticatorData` and `clientDataJSON`, checks that the client data's
//! challenge is the transaction hash, and reconstructs the signed bytes
//! (`authenticatorData || SHA-256(clientDataJSON)`) for verification.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rooch_crypto::signature::EcdsaSignature;
use rooch_crypto::{PublicKey, Secp256r1PublicKey};
use rooch_primitives::bcs;
use rooch_primitives::hash::sha256;
use serde::Deserialize;

use crate::envelope::{Envelope, EnvelopeType};
use crate::MessageError;

/// `type` of client data for an assertion (as opposed to a registration).
pub const WEBAUTHN_GET: &str = "webauthn.get";

/// The fields of `clientDataJSON` this envelope reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientData {
    /// Ceremony type, `webauthn.get` for assertions.
    #[serde(rename = "type")]
    pub kind: String,
    /// Base64url challenge the relying party issued.
    pub challenge: String,
    /// Origin of the page that requested the assertion.
    #[serde(default)]
    pub origin: Option<String>,
}

/// Envelope holding a WebAuthn assertion's signed inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebauthnEnvelope {
    authenticator_data: Vec<u8>,
    client_data_json: Vec<u8>,
}

impl WebauthnEnvelope {
    /// Wrap the raw `authenticatorData` and `clientDataJSON` of an assertion.
    pub fn new(authenticator_data: Vec<u8>, client_data_json: Vec<u8>) -> Self {
        WebauthnEnvelope {
            authenticator_data,
            client_data_json,
        }
    }

    /// Raw authenticator data.
    pub fn authenticator_data(&self) -> &[u8] {
        &self.authenticator_data
    }

    /// Raw client data JSON bytes.
    pub fn client_data_json(&self) -> &[u8] {
        &self.client_data_json
    }

    /// Parse the client data JSON.
    pub fn client_data(&self) -> Result<ClientData, MessageError> {
        serde_json::from_slice(&self.client_data_json)
            .map_err(|e| MessageError::InvalidClientData(e.to_string()))
    }

    /// Check that this is an assertion whose challenge is `tx_hash`.
    pub fn validate(&self, tx_hash: &[u8; 32]) -> Result<(), MessageError> {
        let client_data = self.client_data()?;
        if client_data.kind != WEBAUTHN_GET {
            return Err(MessageError::InvalidClientData(format!(
                "expected type '{}', got '{}'",
                WEBAUTHN_GET, client_data.kind
            )));
        }
        let challenge = URL_SAFE_NO_PAD
            .decode(client_data.challenge.trim_end_matches('='))
            .map_err(|e| MessageError::InvalidClientData(format!("challenge: {e}")))?;
        if challenge != tx_hash {
            return Err(MessageError::ChallengeMismatch {
                expected: hex::encode(tx_hash),
                actual: hex::encode(&challenge),
            });
        }
        Ok(())
    }

    /// `authenticatorData || SHA-256(clientDataJSON)`: the bytes the
    /// authenticator signed (it applies SHA-256 itself).
    pub fn signed_data(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.authenticator_data.len() + 32);
        out.extend_from_slice(&self.authenticator_data);
        out.extend_from_slice(&sha256(&self.client_data_json));
        out
    }

    /// Verify a compact P-256 signature against [`Self::signed_data`].
    pub fn verify(&self, public_key: &Secp256r1PublicKey, signature: &[u8]) -> bool {
        public_key.verify(&self.signed_data(), signature)
    }
}

impl Envelope for WebauthnEnvelope {
    fn envelope_type(&self) -> EnvelopeType {
        EnvelopeType::WebAuthnV0
    }

    /// Validates the challenge, then returns the signed data.
    fn build_message(&self, tx_hash: &[u8; 32]) -> Result<Vec<u8>, MessageError> {
        self.validate(tx_hash)?;
        Ok(self.signed_data())
    }

    fn compute_digest(&self, _tx_hash: &[u8; 32]) -> Result<Vec<u8>, MessageError> {
        Ok(self.signed_data())
    }

    fn envelope_data(&self) -> Result<Vec<u8>, MessageError> {
        Ok(bcs::to_bytes(&(
            self.authenticator_data.as_slice(),
            self.client_data_json.as_slice(),
        ))?)
    }
}

/// Turn an authenticator's DER signature into compact low-S `r || s`.
///
/// Fails with `InvalidSignatureEncoding` on malformed DER.
pub fn canonicalize_signature(der: &[u8]) -> Result<[u8; 64], MessageError> {
    let signature = EcdsaSignature::from_der(der)?;
    Ok(signature.normalize_s().to_compact())
}
