//! Content inputs and encrypted payloads
//!
//! [`ContentInput`] is what callers hand the registration flow; the path
//! variant lets stream-mode encryption read from disk without buffering the
//! whole file. [`EncryptedPayload`] is what uploaders receive; its variant
//! always matches the encoding tag recorded in metadata.

use std::path::PathBuf;
use std::pin::Pin;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::StorageError;

/// Plain content to encrypt: either bytes already in memory or a file path
pub enum ContentInput {
    Memory { file_name: String, bytes: Vec<u8> },
    Path(PathBuf),
}

impl ContentInput {
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Memory {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// File name used for uploads and metadata
    pub fn file_name(&self) -> String {
        match self {
            Self::Memory { file_name, .. } => file_name.clone(),
            Self::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
        }
    }

    /// Load the full plaintext into memory
    pub async fn read_bytes(&self) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::Memory { bytes, .. } => Ok(bytes.clone()),
            Self::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| StorageError::Read(format!("{}: {e}", path.display()))),
        }
    }

    /// Open the plaintext as an async reader (for stream-mode encryption)
    pub async fn open_reader(
        &self,
    ) -> Result<Pin<Box<dyn AsyncRead + Send>>, StorageError> {
        match self {
            Self::Memory { bytes, .. } => Ok(Box::pin(std::io::Cursor::new(bytes.clone()))),
            Self::Path(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| StorageError::Read(format!("{}: {e}", path.display())))?;
                Ok(Box::pin(file))
            }
        }
    }
}

impl std::fmt::Debug for ContentInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory { file_name, bytes } => f
                .debug_struct("Memory")
                .field("file_name", file_name)
                .field("len", &bytes.len())
                .finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

/// Ciphertext handed to an uploader, tagged by encoding mode.
///
/// The variant must agree with the [`EncryptLogic`](crate::EncryptLogic)
/// recorded in metadata: that tag is what tells the retrieving side which
/// decode path applies.
pub enum EncryptedPayload {
    /// Text-mode container (base64 of the ciphertext envelope)
    Text(String),
    /// Buffer-mode container (nonce-prefixed ciphertext bytes)
    Bytes(Vec<u8>),
    /// Stream-mode ciphertext, produced while the upload runs
    Stream(Pin<Box<dyn AsyncRead + Send>>),
}

impl EncryptedPayload {
    /// Drain the payload into memory.
    ///
    /// Mainly for uploaders that need a contiguous body; stream payloads
    /// are consumed sequentially.
    pub async fn into_bytes(self) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::Text(text) => Ok(text.into_bytes()),
            Self::Bytes(bytes) => Ok(bytes),
            Self::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .await
                    .map_err(|e| StorageError::Read(e.to_string()))?;
                Ok(buf)
            }
        }
    }
}

impl std::fmt::Debug for EncryptedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
