//! Configuration for the token client

use std::sync::Arc;

use tokenveil_core::{ContentUploader, MetadataUploader};

use crate::auth::ChallengeFallback;

/// Configuration for a [`TokenClient`](crate::TokenClient).
///
/// Storage is resolved once, here: flows that need an uploader check for
/// it before any network activity and fail with a configuration error
/// when it is absent. A read-only client (retrieval only) needs neither
/// uploader.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the key-custody service
    pub custody_url: String,
    /// Behavior when the challenge endpoint is unreachable
    pub challenge_fallback: ChallengeFallback,
    /// Storage for encrypted content and thumbnails
    pub content_uploader: Option<Arc<dyn ContentUploader>>,
    /// Storage for the metadata document
    pub metadata_uploader: Option<Arc<dyn MetadataUploader>>,
}

impl ClientConfig {
    /// Create a configuration pointing at a custody service
    pub fn new(custody_url: impl Into<String>) -> Self {
        Self {
            custody_url: custody_url.into(),
            challenge_fallback: ChallengeFallback::default(),
            content_uploader: None,
            metadata_uploader: None,
        }
    }

    /// Set the content uploader
    pub fn with_content_uploader(mut self, uploader: Arc<dyn ContentUploader>) -> Self {
        self.content_uploader = Some(uploader);
        self
    }

    /// Set the metadata uploader
    pub fn with_metadata_uploader(mut self, uploader: Arc<dyn MetadataUploader>) -> Self {
        self.metadata_uploader = Some(uploader);
        self
    }

    /// Set the challenge fallback behavior
    pub fn with_challenge_fallback(mut self, fallback: ChallengeFallback) -> Self {
        self.challenge_fallback = fallback;
        self
    }
}
