//! Error types for tokenveil-cipher

use thiserror::Error;

/// Errors that can occur during content encryption and decryption
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    #[error("Data too short: expected at least {expected} bytes, got {actual}")]
    DataTooShort { expected: usize, actual: usize },

    #[error("Stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cipher operations
pub type CipherResult<T> = Result<T, CipherError>;
