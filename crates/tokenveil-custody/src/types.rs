//! Wire types for the key-custody REST API
//!
//! Request bodies are snake_case; response field names follow the
//! service's camelCase convention.

use serde::{Deserialize, Serialize};

use tokenveil_core::{Address, ChainId, DocumentId, Signature};

/// Optional flags accepted by the key registration endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterKeyOptions {
    pub has_nonce: Option<bool>,
    pub auto_migration: Option<bool>,
}

/// Body of `POST /keys`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterKeyRequest {
    pub document_id: DocumentId,
    pub chain_id: ChainId,
    pub key: String,
    pub signature: Signature,
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_nonce: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_migration: Option<bool>,
}

impl RegisterKeyRequest {
    pub fn new(
        document_id: DocumentId,
        chain_id: ChainId,
        key: impl Into<String>,
        signature: Signature,
        address: Address,
        options: RegisterKeyOptions,
    ) -> Self {
        Self {
            document_id,
            chain_id,
            key: key.into(),
            signature,
            address,
            has_nonce: options.has_nonce,
            auto_migration: options.auto_migration,
        }
    }
}

/// Response of `GET /keys/{documentId}/{chainId}`
#[derive(Debug, Deserialize)]
pub struct KeyResponse {
    #[serde(rename = "documentKey")]
    pub document_key: DocumentKey,
}

#[derive(Debug, Deserialize)]
pub struct DocumentKey {
    pub key: String,
}

/// Response of `GET /signature/{contractAddress}/{chainId}`
#[derive(Debug, Deserialize)]
pub struct SignMessageResponse {
    #[serde(rename = "signMessage")]
    pub sign_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_wire_shape() {
        let request = RegisterKeyRequest::new(
            DocumentId::new([0x11; 32]),
            80001,
            "content-key",
            Signature::new("0xsig"),
            Address::new("0xABCD"),
            RegisterKeyOptions::default(),
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["document_id"], format!("0x{}", "11".repeat(32)));
        assert_eq!(json["chain_id"], 80001);
        assert_eq!(json["key"], "content-key");
        assert_eq!(json["signature"], "0xsig");
        assert_eq!(json["address"], "0xabcd");
        // unset flags are omitted, not serialized as null
        assert!(json.get("has_nonce").is_none());
        assert!(json.get("auto_migration").is_none());
    }

    #[test]
    fn test_register_request_with_flags() {
        let request = RegisterKeyRequest::new(
            DocumentId::new([0x22; 32]),
            1,
            "k",
            Signature::new("s"),
            Address::new("a"),
            RegisterKeyOptions {
                has_nonce: Some(true),
                auto_migration: Some(false),
            },
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["has_nonce"], true);
        assert_eq!(json["auto_migration"], false);
    }

    #[test]
    fn test_key_response_parses_camel_case() {
        let response: KeyResponse =
            serde_json::from_str(r#"{"documentKey":{"key":"released-key"}}"#).unwrap();
        assert_eq!(response.document_key.key, "released-key");
    }

    #[test]
    fn test_sign_message_response_parses_camel_case() {
        let response: SignMessageResponse =
            serde_json::from_str(r#"{"signMessage":"Sign to prove ownership"}"#).unwrap();
        assert_eq!(response.sign_message, "Sign to prove ownership");
    }
}
