//! Error types for RPC transport and client operations.

/// Errors raised by an [`RpcTransport`](crate::transport::RpcTransport).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("server error ({status_code}): {message}")]
    ServerError {
        /// HTTP status code.
        status_code: u16,
        /// Response body, if any.
        message: String,
    },

    /// The node returned a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },

    /// Failed to serialize or deserialize data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Errors that can occur when using a [`RoochClient`](crate::RoochClient).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The transport failed; carried unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A result did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A view function did not execute successfully.
    #[error("view function {function} failed: {status}")]
    ViewFunctionFailed {
        /// The function that was called.
        function: String,
        /// The VM status the node reported.
        status: String,
    },

    /// Failed to deserialize a result.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Transaction assembly or signing failed.
    #[error(transparent)]
    Transaction(#[from] rooch_transaction::TransactionError),

    /// Address, type tag or encoding error.
    #[error(transparent)]
    Primitives(#[from] rooch_primitives::PrimitivesError),
}
