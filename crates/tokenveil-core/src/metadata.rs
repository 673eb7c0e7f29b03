//! Public metadata model
//!
//! Metadata is world-readable: anyone can fetch it. Only the encoding tag
//! ([`EncryptLogic`]) and the content locators are required for decryption;
//! everything else is descriptive.

use serde::{Deserialize, Serialize};

use crate::id::TokenId;

/// Content encoding tag.
///
/// Selects which encrypt path runs at registration and which decode path
/// runs at retrieval. Carried in metadata next to the content locators; the
/// decrypting side must use the matching path or decoding fails (the cipher
/// authenticates, it never silently corrupts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptLogic {
    /// Content is base64-encoded, then encrypted as text. Suits small data.
    #[default]
    Base64,
    /// Content is encrypted as one in-memory buffer. Suits data that fits in memory.
    Binary,
    /// Content is encrypted chunk-wise as a byte stream. Suits large files;
    /// decoding is sequential only.
    Stream,
}

/// The metadata document as stored and fetched over plain HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainMetadata {
    pub name: String,
    pub description: String,
    /// Thumbnail locator (world-readable)
    pub image: String,
    pub mime_type: String,
    #[serde(default)]
    pub encrypt_logic: EncryptLogic,
    /// Locators of the encrypted content, one per file
    pub encrypted_data: Vec<String>,
}

/// Public view of a token's metadata, as returned to any caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub id: TokenId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub mime_type: String,
    pub encrypt_logic: EncryptLogic,
}

impl Metadata {
    /// Build the public view from a fetched metadata document
    pub fn from_plain(id: TokenId, plain: &PlainMetadata) -> Self {
        Self {
            id,
            name: plain.name.clone(),
            description: plain.description.clone(),
            image: plain.image.clone(),
            mime_type: plain.mime_type.clone(),
            encrypt_logic: plain.encrypt_logic,
        }
    }
}
