//! # Tokenveil Cipher
//!
//! Symmetric content encryption for the Tokenveil SDK.
//!
//! One key representation, three content shapes:
//!
//! - **Text mode** ([`encrypt_string`] / [`decrypt_string`]): any string in,
//!   printable container out. Used for base64-encoded content.
//! - **Buffer mode** ([`encrypt_bytes`] / [`decrypt_bytes`]): a whole
//!   in-memory buffer, one random nonce per call.
//! - **Stream mode** ([`encrypt_stream`] / [`decrypt_stream`]): chunk-wise
//!   authenticated encryption over async byte streams, for content too
//!   large to buffer. Decoding is sequential only.
//!
//! All modes authenticate: tampered or mismatched ciphertext fails with a
//! [`CipherError`], it never yields corrupted plaintext.
//!
//! ## Example
//!
//! ```rust
//! use tokenveil_cipher::{encrypt_string, decrypt_string, ContentKey};
//!
//! let key = ContentKey::generate();
//! let sealed = encrypt_string("secret payload", &key).unwrap();
//! assert_eq!(decrypt_string(&sealed, &key).unwrap(), "secret payload");
//! ```

pub mod cipher;
pub mod error;
pub mod key;
pub mod stream;

// Re-exports
pub use cipher::{
    decrypt_bytes, decrypt_string, encrypt_bytes, encrypt_string, EncryptedContent, NONCE_SIZE,
};
pub use error::{CipherError, CipherResult};
pub use key::{create_random_key, ContentKey, KEY_SIZE};
pub use stream::{decrypt_stream, encrypt_stream, PLAIN_CHUNK_SIZE, STREAM_NONCE_SIZE};
