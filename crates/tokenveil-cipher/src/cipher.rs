//! Text and buffer encryption modes
//!
//! Both modes share one container: a random 12-byte nonce followed by the
//! ChaCha20-Poly1305 ciphertext. Text mode additionally base64-encodes the
//! container so it travels as a plain string.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::aead::Aead;
use chacha20poly1305::Nonce;
use rand::RngCore;

use crate::error::CipherError;
use crate::key::ContentKey;

/// Nonce size for ChaCha20-Poly1305 (12 bytes)
pub const NONCE_SIZE: usize = 12;

/// Ciphertext container: nonce followed by authenticated ciphertext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedContent {
    /// Nonce used for encryption
    pub nonce: [u8; NONCE_SIZE],
    /// The encrypted content with authentication tag
    pub ciphertext: Vec<u8>,
}

impl EncryptedContent {
    /// Convert to bytes (nonce || ciphertext)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Parse from bytes (nonce || ciphertext)
    pub fn from_bytes(data: &[u8]) -> Result<Self, CipherError> {
        if data.len() < NONCE_SIZE {
            return Err(CipherError::DataTooShort {
                expected: NONCE_SIZE,
                actual: data.len(),
            });
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&data[..NONCE_SIZE]);

        Ok(Self {
            nonce,
            ciphertext: data[NONCE_SIZE..].to_vec(),
        })
    }
}

/// Encrypt a plaintext buffer under a fresh random nonce
pub(crate) fn seal(plaintext: &[u8], key: &ContentKey) -> Result<EncryptedContent, CipherError> {
    let cipher = key.aead();

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    Ok(EncryptedContent {
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Decrypt a container, verifying its authentication tag
pub(crate) fn open(sealed: &EncryptedContent, key: &ContentKey) -> Result<Vec<u8>, CipherError> {
    let cipher = key.aead();
    let nonce = Nonce::from_slice(&sealed.nonce);

    cipher
        .decrypt(nonce, sealed.ciphertext.as_slice())
        .map_err(|_| CipherError::DecryptionFailed("authentication failed".to_string()))
}

/// Encrypt a string (text mode).
///
/// The result is base64 of the nonce-prefixed ciphertext, so it can be
/// stored and fetched as plain text.
pub fn encrypt_string(plaintext: &str, key: &ContentKey) -> Result<String, CipherError> {
    let sealed = seal(plaintext.as_bytes(), key)?;
    Ok(STANDARD.encode(sealed.to_bytes()))
}

/// Decrypt a text-mode container back to the original string
pub fn decrypt_string(container: &str, key: &ContentKey) -> Result<String, CipherError> {
    let bytes = STANDARD
        .decode(container)
        .map_err(|e| CipherError::MalformedContainer(format!("invalid base64: {e}")))?;
    let sealed = EncryptedContent::from_bytes(&bytes)?;
    let plaintext = open(&sealed, key)?;
    String::from_utf8(plaintext)
        .map_err(|_| CipherError::DecryptionFailed("plaintext is not valid UTF-8".to_string()))
}

/// Encrypt an in-memory buffer (buffer mode)
pub fn encrypt_bytes(plaintext: &[u8], key: &ContentKey) -> Result<Vec<u8>, CipherError> {
    Ok(seal(plaintext, key)?.to_bytes())
}

/// Decrypt a buffer-mode container
pub fn decrypt_bytes(data: &[u8], key: &ContentKey) -> Result<Vec<u8>, CipherError> {
    let sealed = EncryptedContent::from_bytes(data)?;
    open(&sealed, key)
}
