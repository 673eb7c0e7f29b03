//! Retrieval results
//!
//! What a caller gets back for a token depends on their standing: the
//! public view is just descriptive metadata, the extracted view carries
//! decrypted content with per-file outcomes.

use tokenveil_core::{Address, EncryptLogic, Metadata, TokenId};

use crate::error::ClientError;

/// One decrypted content entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptedFile {
    /// Text-mode plaintext (the base64 string the creator encrypted)
    Text(String),
    /// Buffer- or stream-mode plaintext bytes
    Bytes(Vec<u8>),
}

/// Outcome of fetching and decrypting one content locator.
///
/// Failures are isolated per file: a corrupt sibling never hides an
/// entry that decrypted fine.
#[derive(Debug)]
pub struct FileOutcome {
    /// The content locator this outcome is for
    pub url: String,
    pub result: Result<DecryptedFile, ClientError>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Owner/minter view of a token: metadata plus decrypted content
#[derive(Debug)]
pub struct ExtractedMetadata {
    pub id: TokenId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub mime_type: String,
    pub encrypt_logic: EncryptLogic,
    /// Display name derived from the first content locator
    pub file_name: String,
    /// Per-file decrypt outcomes, in metadata order
    pub files: Vec<FileOutcome>,
}

impl ExtractedMetadata {
    /// The entries that decrypted successfully
    pub fn decrypted(&self) -> impl Iterator<Item = &DecryptedFile> {
        self.files.iter().filter_map(|f| f.result.as_ref().ok())
    }

    /// Locators of the entries that failed
    pub fn failed_urls(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| f.result.is_err())
            .map(|f| f.url.as_str())
            .collect()
    }
}

/// What the caller may see for a token, decided per request from chain
/// state
#[derive(Debug)]
pub enum MetadataView {
    /// Caller is neither owner nor minter: descriptive fields only
    Public(Metadata),
    /// Caller holds decrypt rights
    Extracted(ExtractedMetadata),
}

/// A token's metadata view plus its current owner
#[derive(Debug)]
pub struct TokenView {
    pub owner: Address,
    pub metadata: MetadataView,
}
