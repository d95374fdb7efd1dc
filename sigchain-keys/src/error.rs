use thiserror::Error;

/// Error types for the sigchain-keys crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Key generation error: {0}")]
    GenerationError(String),

    #[error("Key encoding error: {0}")]
    EncodingError(String),

    #[error("Key decoding error: {0}")]
    DecodingError(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Verification error: {0}")]
    VerificationError(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

impl From<pkcs8::Error> for KeyError {
    fn from(err: pkcs8::Error) -> Self {
        KeyError::DecodingError(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for KeyError {
    fn from(err: pkcs8::spki::Error) -> Self {
        KeyError::DecodingError(err.to_string())
    }
}

/// Result type for sigchain-keys operations
pub type Result<T> = std::result::Result<T, KeyError>;
