//! Content key management
//!
//! A [`ContentKey`] is an arbitrary UTF-8 secret string; the actual
//! 256-bit cipher key is derived from it with HKDF-SHA256. This keeps the
//! key representation identical across all cipher modes and lets the
//! key-custody service store and release keys as plain strings.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chacha20poly1305::aead::KeyInit;
use chacha20poly1305::ChaCha20Poly1305;
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the derived cipher key (256 bits)
pub const KEY_SIZE: usize = 32;

/// Entropy drawn for a generated key secret (before encoding)
const KEY_ENTROPY_BYTES: usize = 32;

/// Domain separation for the key derivation
const KEY_CONTEXT: &[u8] = b"tokenveil.content-key.v1";

/// Generate a high-entropy random key string.
///
/// 256 bits from the system CSPRNG, base64url-encoded. Generated
/// independently of any document; binding to a document happens at
/// registration with the custody service.
pub fn create_random_key() -> String {
    let mut entropy = [0u8; KEY_ENTROPY_BYTES];
    rand::rng().fill_bytes(&mut entropy);
    let key = URL_SAFE_NO_PAD.encode(entropy);
    entropy.zeroize();
    key
}

/// Symmetric content key.
///
/// Never persisted by the SDK beyond the active operation; the custody
/// service owns the key after registration. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ContentKey {
    secret: String,
}

impl ContentKey {
    /// Wrap an existing secret string (e.g. one released by the custody
    /// service)
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Generate a fresh random key
    pub fn generate() -> Self {
        Self {
            secret: create_random_key(),
        }
    }

    /// The secret string as registered with the custody service
    pub fn as_str(&self) -> &str {
        &self.secret
    }

    /// Derive the cipher instance for this key
    pub(crate) fn aead(&self) -> ChaCha20Poly1305 {
        let hk = Hkdf::<Sha256>::new(None, self.secret.as_bytes());
        let mut okm = [0u8; KEY_SIZE];
        hk.expand(KEY_CONTEXT, &mut okm)
            .expect("32 bytes is a valid HKDF-SHA256 output length");
        let cipher = ChaCha20Poly1305::new_from_slice(&okm)
            .expect("derived key has the cipher's key length");
        okm.zeroize();
        cipher
    }
}

impl std::fmt::Debug for ContentKey {
    // never leak the secret through logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ContentKey(..)")
    }
}
