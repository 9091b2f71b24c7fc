/// Unified error type for the primitives layer.
///
/// Covers canonical encoding and decoding, address and type-tag parsing,
/// and text encodings (hex, bech32, base64).
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    /// Decode-time violation: truncated buffer, bad length prefix, unknown variant.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Encode-time validation hook rejected the value.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Type tag, struct tag or identifier text could not be parsed.
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid bech32: {0}")]
    InvalidBech32(String),

    #[error("invalid length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
