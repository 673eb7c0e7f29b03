//! HTTP client for the key-custody service

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use tokenveil_core::{Address, ChainId, DocumentId, Signature};

use crate::error::ApiError;
use crate::types::{KeyResponse, RegisterKeyRequest, SignMessageResponse};

/// The custody-service operations the SDK depends on.
///
/// A trait so tests (and alternative custody deployments) can substitute
/// the HTTP client.
#[async_trait]
pub trait CustodyApi: Send + Sync {
    /// Submit a freshly generated content key under a document id.
    ///
    /// Called once per document, right after minting.
    async fn register_key(&self, request: &RegisterKeyRequest) -> Result<(), ApiError>;

    /// Retrieve the content key for a document.
    ///
    /// The service verifies the signature and on-chain standing before
    /// releasing the key; a rejection surfaces as
    /// [`ApiError::Unauthorized`].
    async fn fetch_key(
        &self,
        document_id: &DocumentId,
        chain_id: ChainId,
        signature: &Signature,
        address: &Address,
    ) -> Result<String, ApiError>;

    /// Ask the service which message it expects the caller to sign for
    /// this contract/chain/address triple.
    async fn challenge_message(
        &self,
        contract: &Address,
        chain_id: ChainId,
        address: &Address,
    ) -> Result<String, ApiError>;
}

/// HTTP client for the key-custody service
///
/// # Example
///
/// ```rust,no_run
/// use tokenveil_custody::{CustodyApi, CustodyClient};
/// use tokenveil_core::{Address, DocumentId, Signature};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CustodyClient::new("https://custody.example.network");
/// let key = client
///     .fetch_key(
///         &DocumentId::generate(),
///         137,
///         &Signature::new("0x.."),
///         &Address::new("0x.."),
///     )
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct CustodyClient {
    base_url: String,
    client: Client,
}

impl CustodyClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// Service endpoint this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn keys_url(&self) -> String {
        format!("{}/keys", self.base_url)
    }

    fn key_url(&self, document_id: &DocumentId, chain_id: ChainId) -> String {
        format!("{}/keys/{}/{}", self.base_url, document_id.to_hex(), chain_id)
    }

    fn signature_url(&self, contract: &Address, chain_id: ChainId) -> String {
        format!("{}/signature/{}/{}", self.base_url, contract, chain_id)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized(body));
        }

        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::NotFound(body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Status handling for endpoints whose body we do not consume
    async fn expect_success(&self, response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized(body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl CustodyApi for CustodyClient {
    async fn register_key(&self, request: &RegisterKeyRequest) -> Result<(), ApiError> {
        debug!(document_id = %request.document_id, chain_id = request.chain_id, "registering key");

        let response = self
            .client
            .post(self.keys_url())
            .json(request)
            .send()
            .await?;

        self.expect_success(response).await
    }

    async fn fetch_key(
        &self,
        document_id: &DocumentId,
        chain_id: ChainId,
        signature: &Signature,
        address: &Address,
    ) -> Result<String, ApiError> {
        debug!(document_id = %document_id, chain_id, "fetching key");

        let response = self
            .client
            .get(self.key_url(document_id, chain_id))
            .query(&[
                ("signature", signature.as_str()),
                ("address", address.as_str()),
            ])
            .send()
            .await?;

        let body: KeyResponse = self.handle_response(response).await?;
        Ok(body.document_key.key)
    }

    async fn challenge_message(
        &self,
        contract: &Address,
        chain_id: ChainId,
        address: &Address,
    ) -> Result<String, ApiError> {
        let response = self
            .client
            .get(self.signature_url(contract, chain_id))
            .query(&[("address", address.as_str())])
            .send()
            .await?;

        let body: SignMessageResponse = self.handle_response(response).await?;
        Ok(body.sign_message)
    }
}
