//! # Tokenveil Core
//!
//! Shared types and collaborator traits for the Tokenveil SDK.
//!
//! Tokenveil gates off-chain encrypted content behind on-chain token
//! ownership. This crate holds the pieces every other crate agrees on:
//!
//! - Identifiers: [`DocumentId`], [`TokenId`], [`Address`], [`Signature`]
//! - The content encoding tag: [`EncryptLogic`]
//! - The public metadata document: [`PlainMetadata`] / [`Metadata`]
//! - Injected collaborator seams: [`Signer`], [`TokenContract`],
//!   [`ContentUploader`], [`MetadataUploader`], [`ProgressSubscriber`]
//!
//! The collaborators are deliberately traits: chain bindings, storage
//! backends and wallets live outside this SDK and are supplied at
//! construction time.

pub mod content;
pub mod error;
pub mod id;
pub mod metadata;
pub mod traits;

// Re-exports
pub use content::{ContentInput, EncryptedPayload};
pub use error::{ContractError, IdError, SignerError, StorageError};
pub use id::{Address, ChainId, DocumentId, Signature, TokenId, DOCUMENT_ID_SIZE};
pub use metadata::{EncryptLogic, Metadata, PlainMetadata};
pub use traits::{
    ContentUploader, GasSettings, MetadataUploader, MintStep, ProgressSubscriber, Signer,
    TokenContract,
};
