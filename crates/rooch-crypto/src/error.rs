use rooch_primitives::PrimitivesError;

/// Error type for key management and signing operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Secret material failed to decode, named another scheme, or failed the
    /// sign/verify canary check.
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Path does not follow the scheme's derivation grammar.
    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Externally supplied signature bytes could not be parsed.
    #[error("invalid signature encoding: {0}")]
    InvalidSignatureEncoding(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("unknown signature scheme flag: {0}")]
    UnknownScheme(u8),

    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}
