//! Signature authentication with challenge caching
//!
//! The custody service gates key release on a wallet signature over a
//! challenge message it issues. The challenge text is not guaranteed
//! stable across calls, so the [`Authenticator`] caches the pair
//! `{challenge, signature}` and drops the signature whenever the
//! challenge text changes. An unchanged challenge reuses the cached
//! signature without prompting the wallet again.

use tracing::{debug, warn};

use tokenveil_core::{Address, Signature, Signer};
use tokenveil_custody::CustodyApi;

use crate::error::ClientError;

/// Message signed when the custody service cannot provide one
pub const DEFAULT_CHALLENGE_MESSAGE: &str = "Hello Tokenveil";

/// What to do when the challenge endpoint is unreachable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeFallback {
    /// Sign a fixed message instead. Keeps signing possible while the
    /// custody service is down; the service accepts the fixed message as
    /// a degraded-mode challenge.
    Message(String),
    /// Surface the service failure to the caller.
    Error,
}

impl Default for ChallengeFallback {
    fn default() -> Self {
        Self::Message(DEFAULT_CHALLENGE_MESSAGE.to_string())
    }
}

struct CachedSignature {
    challenge: String,
    signature: Signature,
}

/// Holds the cached challenge/signature pair for one client instance.
///
/// State is explicit and instance-scoped; mutation happens only in
/// [`Authenticator::sign`], which takes `&mut self`.
pub struct Authenticator {
    fallback: ChallengeFallback,
    cached: Option<CachedSignature>,
}

impl Authenticator {
    pub fn new(fallback: ChallengeFallback) -> Self {
        Self {
            fallback,
            cached: None,
        }
    }

    /// The currently cached signature, if `sign` has succeeded
    pub fn signature(&self) -> Option<&Signature> {
        self.cached.as_ref().map(|c| &c.signature)
    }

    /// The signature, or the precondition failure every key operation
    /// must raise before touching the network
    pub(crate) fn require_signature(&self) -> Result<&Signature, ClientError> {
        self.signature().ok_or(ClientError::NotSigned)
    }

    /// Obtain (or refresh) the signature for the custody service.
    ///
    /// Asks the service for the expected challenge, falling back per the
    /// configured [`ChallengeFallback`] when that call fails. The wallet
    /// is only prompted when the challenge text differs from the cached
    /// one.
    pub async fn sign(
        &mut self,
        signer: &dyn Signer,
        custody: &dyn CustodyApi,
        contract: &Address,
    ) -> Result<(), ClientError> {
        let chain_id = signer.chain_id().await?;
        let address = signer.address().await?;

        let challenge = match custody.challenge_message(contract, chain_id, &address).await {
            Ok(message) => message,
            Err(err) => match &self.fallback {
                ChallengeFallback::Message(message) => {
                    warn!(error = %err, "challenge endpoint unavailable, signing fallback message");
                    message.clone()
                }
                ChallengeFallback::Error => return Err(err.into()),
            },
        };

        match &self.cached {
            Some(cached) if cached.challenge == challenge => {
                debug!("challenge unchanged, reusing cached signature");
            }
            _ => {
                let signature = signer.sign_message(&challenge).await?;
                self.cached = Some(CachedSignature {
                    challenge,
                    signature,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokenveil_core::{ChainId, DocumentId, SignerError};
    use tokenveil_custody::{ApiError, RegisterKeyRequest};

    struct CountingSigner {
        prompts: AtomicUsize,
        messages: Mutex<Vec<String>>,
    }

    impl CountingSigner {
        fn new() -> Self {
            Self {
                prompts: AtomicUsize::new(0),
                messages: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Signer for CountingSigner {
        async fn chain_id(&self) -> Result<ChainId, SignerError> {
            Ok(80001)
        }

        async fn address(&self) -> Result<Address, SignerError> {
            Ok(Address::new("0xcaller"))
        }

        async fn sign_message(&self, message: &str) -> Result<Signature, SignerError> {
            let n = self.prompts.fetch_add(1, Ordering::SeqCst);
            self.messages.lock().unwrap().push(message.to_string());
            Ok(Signature::new(format!("sig-{n}-over-{message}")))
        }
    }

    struct ChallengeService {
        challenge: Mutex<Option<String>>,
    }

    #[async_trait]
    impl CustodyApi for ChallengeService {
        async fn register_key(&self, _request: &RegisterKeyRequest) -> Result<(), ApiError> {
            unreachable!("not exercised here")
        }

        async fn fetch_key(
            &self,
            _document_id: &DocumentId,
            _chain_id: ChainId,
            _signature: &Signature,
            _address: &Address,
        ) -> Result<String, ApiError> {
            unreachable!("not exercised here")
        }

        async fn challenge_message(
            &self,
            _contract: &Address,
            _chain_id: ChainId,
            _address: &Address,
        ) -> Result<String, ApiError> {
            match self.challenge.lock().unwrap().clone() {
                Some(message) => Ok(message),
                None => Err(ApiError::Server {
                    status: 503,
                    message: "down".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_unchanged_challenge_signs_once() {
        let signer = CountingSigner::new();
        let custody = ChallengeService {
            challenge: Mutex::new(Some("prove it".to_string())),
        };
        let contract = Address::new("0xc");
        let mut auth = Authenticator::new(ChallengeFallback::default());

        auth.sign(&signer, &custody, &contract).await.unwrap();
        let first = auth.signature().unwrap().clone();

        auth.sign(&signer, &custody, &contract).await.unwrap();
        assert_eq!(auth.signature().unwrap(), &first);
        assert_eq!(signer.prompts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_changed_challenge_invalidates_cache() {
        let signer = CountingSigner::new();
        let custody = ChallengeService {
            challenge: Mutex::new(Some("round one".to_string())),
        };
        let contract = Address::new("0xc");
        let mut auth = Authenticator::new(ChallengeFallback::default());

        auth.sign(&signer, &custody, &contract).await.unwrap();
        let first = auth.signature().unwrap().clone();

        *custody.challenge.lock().unwrap() = Some("round two".to_string());
        auth.sign(&signer, &custody, &contract).await.unwrap();

        assert_ne!(auth.signature().unwrap(), &first);
        assert_eq!(signer.prompts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fallback_message_when_service_down() {
        let signer = CountingSigner::new();
        let custody = ChallengeService {
            challenge: Mutex::new(None),
        };
        let contract = Address::new("0xc");
        let mut auth = Authenticator::new(ChallengeFallback::default());

        auth.sign(&signer, &custody, &contract).await.unwrap();
        assert_eq!(
            signer.messages.lock().unwrap().as_slice(),
            &[DEFAULT_CHALLENGE_MESSAGE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_fallback_error_propagates() {
        let signer = CountingSigner::new();
        let custody = ChallengeService {
            challenge: Mutex::new(None),
        };
        let contract = Address::new("0xc");
        let mut auth = Authenticator::new(ChallengeFallback::Error);

        let result = auth.sign(&signer, &custody, &contract).await;
        assert!(matches!(result, Err(ClientError::Custody(_))));
        assert_eq!(signer.prompts.load(Ordering::SeqCst), 0);
        assert!(auth.signature().is_none());
    }

    #[test]
    fn test_require_signature_before_sign() {
        let auth = Authenticator::new(ChallengeFallback::default());
        assert!(matches!(
            auth.require_signature(),
            Err(ClientError::NotSigned)
        ));
    }
}
