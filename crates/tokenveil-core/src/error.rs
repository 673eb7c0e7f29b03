//! Error types for Tokenveil collaborators

use thiserror::Error;

/// Errors from identifier parsing
#[derive(Debug, Error)]
pub enum IdError {
    #[error("Invalid identifier format: {0}")]
    InvalidFormat(String),

    #[error("Invalid identifier length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors from the wallet signer
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("No account available on this signer")]
    AccountUnavailable,

    #[error("Message signing failed: {0}")]
    SigningFailed(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Errors from the on-chain contract binding.
///
/// The SDK never interprets these beyond surfacing them; recovery belongs
/// to the caller who owns the chain connection.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Contract call failed: {0}")]
    Call(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Token not found: {0}")]
    TokenNotFound(u64),
}

/// Errors from injected storage uploaders
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Not supported by this storage backend: {0}")]
    Unsupported(&'static str),
}
