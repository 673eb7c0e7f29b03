//! Error types for the Tokenveil client

use thiserror::Error;

use tokenveil_cipher::CipherError;
use tokenveil_core::{ContractError, SignerError, StorageError, TokenId};
use tokenveil_custody::ApiError;

/// Errors from fetching remote documents (metadata, encrypted content)
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP status {status} fetching {url}")]
    Status { status: u16, url: String },
}

/// Top-level error type for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// A key operation was attempted before a successful `sign()`.
    /// Raised before any network call; there is nothing to retry.
    #[error("Not signed: call sign() before key operations")]
    NotSigned,

    /// A required collaborator was not supplied for the selected mode.
    /// Raised before any network activity.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The metadata document is absent. Listing flows skip such tokens;
    /// single-token flows surface this.
    #[error("Metadata not found for token {0}")]
    MetadataNotFound(TokenId),

    #[error("Malformed metadata document: {0}")]
    MalformedMetadata(String),

    /// One or more files failed to upload. Sibling uploads ran to
    /// completion regardless; the flow stops here because metadata must
    /// reference every content locator.
    #[error("Content upload failed for: {}", failures.join("; "))]
    ContentUpload { failures: Vec<String> },

    #[error("Storage error ({item}): {source}")]
    Storage {
        item: String,
        source: StorageError,
    },

    #[error("Custody service error: {0}")]
    Custody(#[from] ApiError),

    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
