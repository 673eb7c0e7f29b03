//! Error types for the custody client

use thiserror::Error;

/// Errors from the key-custody service
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Request(String),

    /// The service rejected the signature/address pair. This is the
    /// enforcement point for key release; never retried automatically,
    /// since resending the same credential cannot succeed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Request(err.to_string())
    }
}
