//! # Tokenveil Client
//!
//! The orchestrator of the Tokenveil SDK: gates access to off-chain
//! encrypted content behind on-chain token ownership.
//!
//! ## Flows
//!
//! - **Registration** ([`TokenClient::create_token`]): mint a token,
//!   generate a content key, encrypt and upload the content, publish
//!   metadata, register the key with the custody service.
//! - **Retrieval** ([`TokenClient::get_token`]): fetch metadata, classify
//!   the caller against chain state, and decrypt content for owners and
//!   original minters; everyone else gets the public view.
//!
//! ## Collaborators
//!
//! Wallets, chain bindings and storage backends are injected behind the
//! traits in `tokenveil-core`; the key-custody service is reached through
//! `tokenveil-custody`. Tests swap every collaborator for an in-memory
//! double.
//!
//! ## State
//!
//! The only mutable state is the authenticator's cached
//! challenge/signature pair, owned by the client instance and touched
//! only by [`TokenClient::sign`]. Access decisions are computed per
//! request and never cached.

pub mod access;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod view;

// Re-exports
pub use access::{classify, AccessLevel};
pub use auth::{Authenticator, ChallengeFallback, DEFAULT_CHALLENGE_MESSAGE};
pub use client::{CreateTokenRequest, TokenClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, FetchError};
pub use fetch::{HttpFetcher, RemoteFetcher};
pub use view::{DecryptedFile, ExtractedMetadata, FileOutcome, MetadataView, TokenView};

// Convenience re-exports of the types callers wire in
pub use tokenveil_cipher::ContentKey;
pub use tokenveil_core::{
    Address, ContentInput, ContentUploader, DocumentId, EncryptLogic, GasSettings, Metadata,
    MetadataUploader, MintStep, PlainMetadata, ProgressSubscriber, Signature, Signer,
    TokenContract, TokenId,
};
pub use tokenveil_custody::{CustodyApi, CustodyClient, RegisterKeyOptions};
