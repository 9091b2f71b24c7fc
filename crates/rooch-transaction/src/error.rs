/// Error types for transaction assembly and authentication.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The operation is not allowed in the transaction's current state.
    #[error("invalid state: cannot {operation} a transaction in state {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    /// Function id text is not `address::module::function`.
    #[error("invalid function id: {0}")]
    InvalidFunctionId(String),
    /// An authenticator payload is malformed or names an unknown validator.
    #[error("invalid authenticator: {0}")]
    InvalidAuthenticator(String),
    /// An underlying primitives error (forwarded from `rooch-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] rooch_primitives::PrimitivesError),
    /// An underlying key error (forwarded from `rooch-crypto`).
    #[error("crypto error: {0}")]
    Crypto(#[from] rooch_crypto::CryptoError),
    /// An underlying envelope error (forwarded from `rooch-message`).
    #[error("message error: {0}")]
    Message(#[from] rooch_message::MessageError),
}
