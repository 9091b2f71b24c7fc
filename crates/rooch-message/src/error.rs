/// Error types for signing envelopes.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The WebAuthn `clientDataJSON` challenge does not match the transaction hash.
    #[error("webauthn challenge mismatch: expected {expected}, got {actual}")]
    ChallengeMismatch {
        /// Hex of the expected transaction hash.
        expected: String,
        /// Hex of the challenge found in the client data.
        actual: String,
    },
    /// `clientDataJSON` is not valid JSON or not an assertion.
    #[error("invalid client data: {0}")]
    InvalidClientData(String),
    /// The envelope tag byte is not a known envelope type.
    #[error("unknown envelope type: {0}")]
    UnknownEnvelope(u8),
    /// Error from key or signature handling.
    #[error("{0}")]
    Crypto(#[from] rooch_crypto::CryptoError),
    /// Error from the canonical serializer.
    #[error("{0}")]
    Primitives(#[from] rooch_primitives::PrimitivesError),
}
