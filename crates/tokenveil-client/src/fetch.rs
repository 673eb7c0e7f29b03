//! Fetching remote documents
//!
//! Metadata and encrypted content live at opaque locators on arbitrary
//! storage. [`RemoteFetcher`] is the seam; [`HttpFetcher`] is the plain
//! HTTP implementation used in production.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::FetchError;

/// Read-only access to remote documents by locator
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Plain HTTP fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?
            .to_vec())
    }
}
