//! Identifiers shared across the Tokenveil protocol
//!
//! - [`DocumentId`]: random 32-byte id binding one encrypted document to one token
//! - [`TokenId`]: on-chain token id
//! - [`Address`]: EVM-style account address, normalized for comparison
//! - [`Signature`]: opaque wallet signature over a challenge message

use std::fmt::{self, Display};
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdError;

/// Size of a document identifier (32 bytes)
pub const DOCUMENT_ID_SIZE: usize = 32;

/// Chain identifier (EIP-155 style)
pub type ChainId = u64;

/// Random identifier binding one encrypted document to one on-chain token.
///
/// Generated once at registration time with a cryptographically strong
/// random source and immutable afterwards. On the wire it is a
/// `0x`-prefixed hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId([u8; DOCUMENT_ID_SIZE]);

impl DocumentId {
    /// Create a document id from raw bytes
    pub fn new(bytes: [u8; DOCUMENT_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random document id
    ///
    /// Uses the system CSPRNG. Never derived from a counter, so independent
    /// clients cannot collide.
    pub fn generate() -> Self {
        let mut bytes = [0u8; DOCUMENT_ID_SIZE];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; DOCUMENT_ID_SIZE] {
        &self.0
    }

    /// Render as a `0x`-prefixed hex string (the wire form)
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(hex_part)
            .map_err(|e| IdError::InvalidFormat(format!("invalid hex: {e}")))?;
        if bytes.len() != DOCUMENT_ID_SIZE {
            return Err(IdError::InvalidLength {
                expected: DOCUMENT_ID_SIZE,
                actual: bytes.len(),
            });
        }
        let mut id = [0u8; DOCUMENT_ID_SIZE];
        id.copy_from_slice(&bytes);
        Ok(Self(id))
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// On-chain token identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl TokenId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// EVM-style account address.
///
/// Stored lowercase so owner/minter comparisons are insensitive to the
/// checksum casing different providers return.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::new(String::deserialize(deserializer)?))
    }
}

/// Opaque wallet signature.
///
/// Valid only when paired with the exact challenge message it signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn new(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
