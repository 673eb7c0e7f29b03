//! # Tokenveil Custody
//!
//! Client for the remote key-custody service.
//!
//! The custody service stores per-document content keys and releases them
//! only to addresses it can verify, via a wallet signature, currently own
//! or originally minted the corresponding token. That verification happens
//! server-side; this client's job is to present credentials faithfully and
//! surface rejections as [`ApiError::Unauthorized`].
//!
//! [`CustodyApi`] is the seam the orchestrator depends on; [`CustodyClient`]
//! is the HTTP implementation.

pub mod client;
pub mod error;
pub mod types;

// Re-exports
pub use client::{CustodyApi, CustodyClient};
pub use error::ApiError;
pub use types::{RegisterKeyOptions, RegisterKeyRequest};
