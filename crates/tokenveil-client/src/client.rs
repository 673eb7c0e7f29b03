//! The token client: mint/registration and retrieval flows
//!
//! Composes the cipher, the custody client, the authenticator and the
//! injected chain/storage collaborators. All operations are async and
//! single-threaded in spirit: the only mutable state is the
//! authenticator's signature cache, touched exclusively by `sign`.

use std::io::Cursor;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::join_all;
use tracing::{debug, info, warn};

use tokenveil_cipher::{
    create_random_key, decrypt_bytes, decrypt_string, decrypt_stream, encrypt_bytes,
    encrypt_stream, encrypt_string, ContentKey,
};
use tokenveil_core::{
    Address, ContentInput, ContentUploader, DocumentId, EncryptLogic, EncryptedPayload,
    GasSettings, Metadata, MetadataUploader, MintStep, PlainMetadata, ProgressSubscriber,
    Signature, Signer, TokenContract, TokenId,
};
use tokenveil_custody::{CustodyApi, CustodyClient, RegisterKeyOptions, RegisterKeyRequest};

use crate::access::{classify, AccessLevel};
use crate::auth::Authenticator;
use crate::config::ClientConfig;
use crate::error::{ClientError, FetchError};
use crate::fetch::{HttpFetcher, RemoteFetcher};
use crate::view::{DecryptedFile, ExtractedMetadata, FileOutcome, MetadataView, TokenView};

/// Buffer size of the in-process pipe used for stream-mode encryption
const STREAM_PIPE_CAPACITY: usize = 64 * 1024;

/// Everything needed to create one gated token
pub struct CreateTokenRequest {
    pub name: String,
    pub description: String,
    /// The content only the owner/minter may view
    pub files: Vec<ContentInput>,
    /// World-readable preview image
    pub thumbnail: ContentInput,
    /// Royalty basis points paid to the creator on resale
    pub royalty_numerator: u32,
    pub encrypt_logic: EncryptLogic,
    /// Mime type recorded in metadata (detection is the caller's concern)
    pub mime_type: String,
    pub gas: Option<GasSettings>,
    pub key_options: RegisterKeyOptions,
}

/// Client for minting and retrieving gated tokens
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tokenveil_client::{ClientConfig, TokenClient};
///
/// let config = ClientConfig::new("https://custody.example.network")
///     .with_content_uploader(my_storage.clone())
///     .with_metadata_uploader(my_storage);
/// let mut client = TokenClient::new(config, signer, contract);
///
/// client.sign().await?;
/// let token_id = client.create_token(request, None).await?;
/// ```
pub struct TokenClient {
    signer: Arc<dyn Signer>,
    contract: Arc<dyn TokenContract>,
    custody: Arc<dyn CustodyApi>,
    fetcher: Arc<dyn RemoteFetcher>,
    content_uploader: Option<Arc<dyn ContentUploader>>,
    metadata_uploader: Option<Arc<dyn MetadataUploader>>,
    custody_url: String,
    auth: Authenticator,
}

impl TokenClient {
    /// Create a client talking to the configured custody service over HTTP
    pub fn new(
        config: ClientConfig,
        signer: Arc<dyn Signer>,
        contract: Arc<dyn TokenContract>,
    ) -> Self {
        let custody = Arc::new(CustodyClient::new(config.custody_url.clone()));
        let fetcher = Arc::new(HttpFetcher::new());
        Self::with_collaborators(config, signer, contract, custody, fetcher)
    }

    /// Create a client with explicit custody and fetch collaborators
    pub fn with_collaborators(
        config: ClientConfig,
        signer: Arc<dyn Signer>,
        contract: Arc<dyn TokenContract>,
        custody: Arc<dyn CustodyApi>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        Self {
            signer,
            contract,
            custody,
            fetcher,
            content_uploader: config.content_uploader,
            metadata_uploader: config.metadata_uploader,
            custody_url: config.custody_url,
            auth: Authenticator::new(config.challenge_fallback),
        }
    }

    // ==================== Signing ====================

    /// Sign the custody service's challenge message.
    ///
    /// Must succeed before any key operation (registration or
    /// extraction). Idempotent while the challenge text is unchanged.
    pub async fn sign(&mut self) -> Result<(), ClientError> {
        let contract_address = self.contract.contract_address();
        self.auth
            .sign(self.signer.as_ref(), self.custody.as_ref(), &contract_address)
            .await
    }

    /// The cached signature, if `sign` has succeeded
    pub fn signature(&self) -> Option<&Signature> {
        self.auth.signature()
    }

    // ==================== Registration flow ====================

    /// Create a gated token: mint, encrypt, upload, register the key.
    ///
    /// Steps run in order; a failure aborts the remaining steps without
    /// compensation (a failed upload after a successful mint leaves an
    /// orphaned token). The subscriber, when given, is notified after
    /// each completed step.
    pub async fn create_token(
        &self,
        request: CreateTokenRequest,
        subscriber: Option<&dyn ProgressSubscriber>,
    ) -> Result<TokenId, ClientError> {
        let signature = self.auth.require_signature()?.clone();
        let content_uploader = self.require_content_uploader()?;
        let metadata_uploader = self.require_metadata_uploader()?;

        // 1. mint
        let document_id = DocumentId::generate();
        let token_id = self
            .contract
            .mint(
                &self.custody_url,
                request.royalty_numerator,
                &document_id,
                request.gas.as_ref(),
            )
            .await?;
        notify(subscriber, MintStep::MintToken);
        info!(%token_id, %document_id, "token minted");

        // 2. create key
        let key = ContentKey::generate();
        notify(subscriber, MintStep::CreateKey);

        // 3. encrypt
        let batch_id = create_random_key();
        let payloads = self
            .encrypt_files(&request.files, request.encrypt_logic, &key)
            .await?;
        notify(subscriber, MintStep::EncryptContent);

        // 4. upload content + thumbnail
        let content_urls = upload_payloads(content_uploader.as_ref(), payloads, &batch_id).await?;
        let thumbnail_url = content_uploader
            .upload_thumbnail(request.thumbnail, &batch_id)
            .await
            .map_err(|source| ClientError::Storage {
                item: "thumbnail".to_string(),
                source,
            })?;
        notify(subscriber, MintStep::UploadContent);

        // 5. upload metadata
        let metadata = PlainMetadata {
            name: request.name,
            description: request.description,
            image: thumbnail_url,
            mime_type: request.mime_type,
            encrypt_logic: request.encrypt_logic,
            encrypted_data: content_urls,
        };
        metadata_uploader
            .upload_metadata(token_id, &metadata)
            .await
            .map_err(|source| ClientError::Storage {
                item: "metadata".to_string(),
                source,
            })?;
        notify(subscriber, MintStep::UploadMetadata);

        // 6. register key with the custody service
        self.submit_key(document_id, &key, signature, request.key_options)
            .await?;
        notify(subscriber, MintStep::RegisterKey);

        Ok(token_id)
    }

    /// Create a gated token on content-addressed storage: the metadata
    /// locator must exist before minting, so uploads run first and the
    /// mint records the locator.
    pub async fn create_token_with_uploaded_metadata(
        &self,
        request: CreateTokenRequest,
        subscriber: Option<&dyn ProgressSubscriber>,
    ) -> Result<TokenId, ClientError> {
        let signature = self.auth.require_signature()?.clone();
        let content_uploader = self.require_content_uploader()?;
        let metadata_uploader = self.require_metadata_uploader()?;

        // 1. create key
        let key = ContentKey::generate();
        notify(subscriber, MintStep::CreateKey);

        // 2. encrypt
        let batch_id = create_random_key();
        let payloads = self
            .encrypt_files(&request.files, request.encrypt_logic, &key)
            .await?;
        notify(subscriber, MintStep::EncryptContent);

        // 3. upload content + thumbnail
        let content_urls = upload_payloads(content_uploader.as_ref(), payloads, &batch_id).await?;
        let thumbnail_url = content_uploader
            .upload_thumbnail(request.thumbnail, &batch_id)
            .await
            .map_err(|source| ClientError::Storage {
                item: "thumbnail".to_string(),
                source,
            })?;
        notify(subscriber, MintStep::UploadContent);

        // 4. upload metadata, keeping its locator for the mint
        let metadata = PlainMetadata {
            name: request.name,
            description: request.description,
            image: thumbnail_url,
            mime_type: request.mime_type,
            encrypt_logic: request.encrypt_logic,
            encrypted_data: content_urls,
        };
        let metadata_url = metadata_uploader
            .upload_metadata_document(&metadata)
            .await
            .map_err(|source| ClientError::Storage {
                item: "metadata".to_string(),
                source,
            })?;
        notify(subscriber, MintStep::UploadMetadata);

        // 5. mint with the metadata locator
        let document_id = DocumentId::generate();
        let token_id = self
            .contract
            .mint_with_metadata(
                &metadata_url,
                &self.custody_url,
                request.royalty_numerator,
                &document_id,
                request.gas.as_ref(),
            )
            .await?;
        notify(subscriber, MintStep::MintToken);
        info!(%token_id, %document_id, "token minted with metadata locator");

        // 6. register key with the custody service
        self.submit_key(document_id, &key, signature, request.key_options)
            .await?;
        notify(subscriber, MintStep::RegisterKey);

        Ok(token_id)
    }

    /// Mint a bare token with a fresh document id, without content
    pub async fn mint_token(
        &self,
        royalty_numerator: u32,
        gas: Option<&GasSettings>,
    ) -> Result<TokenId, ClientError> {
        let document_id = DocumentId::generate();
        Ok(self
            .contract
            .mint(&self.custody_url, royalty_numerator, &document_id, gas)
            .await?)
    }

    /// Submit a key for an existing token (custody migration path).
    ///
    /// Resolves the document id from chain; requires a prior `sign`.
    pub async fn register_key(
        &self,
        token_id: TokenId,
        key: &ContentKey,
        options: RegisterKeyOptions,
    ) -> Result<(), ClientError> {
        let signature = self.auth.require_signature()?.clone();
        let document_id = self.contract.document_id_of(token_id).await?;
        self.submit_key(document_id, key, signature, options).await
    }

    /// Upload a metadata document for a token, outside the managed flow
    pub async fn upload_metadata(
        &self,
        token_id: TokenId,
        metadata: &PlainMetadata,
    ) -> Result<(), ClientError> {
        let metadata_uploader = self.require_metadata_uploader()?;
        metadata_uploader
            .upload_metadata(token_id, metadata)
            .await
            .map_err(|source| ClientError::Storage {
                item: "metadata".to_string(),
                source,
            })
    }

    // ==================== Retrieval flow ====================

    /// Public metadata for a token, fetchable by anyone
    pub async fn get_metadata(&self, token_id: TokenId) -> Result<Metadata, ClientError> {
        let plain = self.fetch_plain_metadata(token_id).await?;
        Ok(Metadata::from_plain(token_id, &plain))
    }

    /// A token as the calling address may see it: decrypted content for
    /// the owner or original minter, public metadata for anyone else.
    pub async fn get_token(&self, token_id: TokenId) -> Result<TokenView, ClientError> {
        let caller = self.signer.address().await?;
        let level = classify(self.contract.as_ref(), token_id, &caller).await?;
        let owner = self.contract.owner_of(token_id).await?;
        debug!(%token_id, ?level, "access classified");

        let metadata = if level.may_decrypt() {
            MetadataView::Extracted(self.extract_metadata(token_id).await?)
        } else {
            MetadataView::Public(self.get_metadata(token_id).await?)
        };

        Ok(TokenView { owner, metadata })
    }

    /// Fetch and decrypt a token's content.
    ///
    /// The custody service enforces standing when releasing the key; a
    /// rejection surfaces as an unauthorized custody error. Content
    /// entries are fetched and decrypted concurrently, with per-file
    /// outcomes: one corrupt entry does not hide its siblings.
    pub async fn extract_metadata(
        &self,
        token_id: TokenId,
    ) -> Result<ExtractedMetadata, ClientError> {
        let signature = self.auth.require_signature()?.clone();
        let plain = self.fetch_plain_metadata(token_id).await?;

        let document_id = self.contract.document_id_of(token_id).await?;
        let chain_id = self.signer.chain_id().await?;
        let address = self.signer.address().await?;
        let released = self
            .custody
            .fetch_key(&document_id, chain_id, &signature, &address)
            .await?;
        let key = ContentKey::new(released);

        let logic = plain.encrypt_logic;
        let files = join_all(plain.encrypted_data.iter().map(|url| {
            let key = key.clone();
            async move {
                let result = self.fetch_and_decrypt(url, logic, &key).await;
                if let Err(err) = &result {
                    warn!(url, error = %err, "content entry failed to decrypt");
                }
                FileOutcome {
                    url: url.clone(),
                    result,
                }
            }
        }))
        .await;

        let file_name = plain
            .encrypted_data
            .first()
            .map(|url| url.rsplit('/').next().unwrap_or(url).to_string())
            .unwrap_or_default();

        Ok(ExtractedMetadata {
            id: token_id,
            name: plain.name,
            description: plain.description,
            image: plain.image,
            mime_type: plain.mime_type,
            encrypt_logic: logic,
            file_name,
            files,
        })
    }

    /// Metadata of every token the calling address owns.
    ///
    /// Tokens whose metadata is gone are skipped, not fatal: the rest of
    /// the list still comes back.
    pub async fn get_own_tokens(&self) -> Result<Vec<Metadata>, ClientError> {
        let ids = self.get_own_token_ids().await?;
        let results = join_all(ids.into_iter().map(|id| self.get_metadata(id))).await;

        let mut tokens = Vec::new();
        for result in results {
            match result {
                Ok(metadata) => tokens.push(metadata),
                Err(ClientError::MetadataNotFound(id)) => {
                    debug!(%id, "skipping token without metadata");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(tokens)
    }

    /// Token ids owned by the calling address
    pub async fn get_own_token_ids(&self) -> Result<Vec<TokenId>, ClientError> {
        let address = self.signer.address().await?;
        Ok(self.contract.tokens_of_owner(&address).await?)
    }

    /// Token ids originally minted by an address
    pub async fn get_tokens_by_minter(
        &self,
        minter: &Address,
    ) -> Result<Vec<TokenId>, ClientError> {
        Ok(self.contract.tokens_of_minter(minter).await?)
    }

    /// Classify the calling address against a token
    pub async fn access_level(&self, token_id: TokenId) -> Result<AccessLevel, ClientError> {
        let caller = self.signer.address().await?;
        Ok(classify(self.contract.as_ref(), token_id, &caller).await?)
    }

    // ==================== ERC-721 passthroughs ====================

    pub async fn approve(
        &self,
        operator: &Address,
        token_id: TokenId,
        gas: Option<&GasSettings>,
    ) -> Result<(), ClientError> {
        Ok(self.contract.approve(operator, token_id, gas).await?)
    }

    pub async fn approved_for(&self, token_id: TokenId) -> Result<Address, ClientError> {
        Ok(self.contract.approved_for(token_id).await?)
    }

    pub async fn set_approval_for_all(
        &self,
        operator: &Address,
        gas: Option<&GasSettings>,
    ) -> Result<(), ClientError> {
        Ok(self.contract.set_approval_for_all(operator, gas).await?)
    }

    pub async fn is_approved_for_all(
        &self,
        owner: &Address,
        operator: &Address,
    ) -> Result<bool, ClientError> {
        Ok(self.contract.is_approved_for_all(owner, operator).await?)
    }

    /// Transfer a token from the calling address
    pub async fn safe_transfer(
        &self,
        to: &Address,
        token_id: TokenId,
        gas: Option<&GasSettings>,
    ) -> Result<(), ClientError> {
        let from = self.signer.address().await?;
        Ok(self
            .contract
            .safe_transfer_from(&from, to, token_id, gas)
            .await?)
    }

    // ==================== Helpers ====================

    fn require_content_uploader(&self) -> Result<Arc<dyn ContentUploader>, ClientError> {
        self.content_uploader.clone().ok_or_else(|| {
            ClientError::Configuration(
                "no content uploader configured; supply one to create tokens".to_string(),
            )
        })
    }

    fn require_metadata_uploader(&self) -> Result<Arc<dyn MetadataUploader>, ClientError> {
        self.metadata_uploader.clone().ok_or_else(|| {
            ClientError::Configuration(
                "no metadata uploader configured; supply one to create tokens".to_string(),
            )
        })
    }

    /// Encrypt each input per the encoding tag, producing the payloads
    /// the uploader will receive. Stream-mode payloads encrypt lazily
    /// through an in-process pipe while the upload consumes them.
    async fn encrypt_files(
        &self,
        files: &[ContentInput],
        logic: EncryptLogic,
        key: &ContentKey,
    ) -> Result<Vec<(String, EncryptedPayload)>, ClientError> {
        let mut payloads = Vec::with_capacity(files.len());
        for file in files {
            let file_name = file.file_name();
            let payload = match logic {
                EncryptLogic::Base64 => {
                    let bytes = file.read_bytes().await.map_err(|source| {
                        ClientError::Storage {
                            item: file_name.clone(),
                            source,
                        }
                    })?;
                    EncryptedPayload::Text(encrypt_string(&STANDARD.encode(bytes), key)?)
                }
                EncryptLogic::Binary => {
                    let bytes = file.read_bytes().await.map_err(|source| {
                        ClientError::Storage {
                            item: file_name.clone(),
                            source,
                        }
                    })?;
                    EncryptedPayload::Bytes(encrypt_bytes(&bytes, key)?)
                }
                EncryptLogic::Stream => {
                    let reader = file.open_reader().await.map_err(|source| {
                        ClientError::Storage {
                            item: file_name.clone(),
                            source,
                        }
                    })?;
                    let (upload_side, pump_side) = tokio::io::duplex(STREAM_PIPE_CAPACITY);
                    let key = key.clone();
                    let pump_name = file_name.clone();
                    tokio::spawn(async move {
                        // a failed pump closes the pipe early; the truncated
                        // ciphertext cannot authenticate on decrypt
                        if let Err(err) = encrypt_stream(reader, pump_side, &key).await {
                            warn!(file = %pump_name, error = %err, "stream encryption aborted");
                        }
                    });
                    EncryptedPayload::Stream(Box::pin(upload_side))
                }
            };
            payloads.push((file_name, payload));
        }
        Ok(payloads)
    }

    async fn submit_key(
        &self,
        document_id: DocumentId,
        key: &ContentKey,
        signature: Signature,
        options: RegisterKeyOptions,
    ) -> Result<(), ClientError> {
        let chain_id = self.signer.chain_id().await?;
        let address = self.signer.address().await?;
        self.custody
            .register_key(&RegisterKeyRequest::new(
                document_id,
                chain_id,
                key.as_str(),
                signature,
                address,
                options,
            ))
            .await?;
        info!(%document_id, "key registered with custody service");
        Ok(())
    }

    async fn fetch_plain_metadata(
        &self,
        token_id: TokenId,
    ) -> Result<PlainMetadata, ClientError> {
        let url = self.contract.metadata_url(token_id).await?;
        let body = match self.fetcher.fetch_text(&url).await {
            Ok(body) => body,
            Err(FetchError::Status { status: 404, .. }) => {
                return Err(ClientError::MetadataNotFound(token_id));
            }
            Err(err) => return Err(err.into()),
        };

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(ClientError::MetadataNotFound(token_id));
        }

        serde_json::from_str(trimmed).map_err(|e| ClientError::MalformedMetadata(e.to_string()))
    }

    /// Fetch one content entry and decode it per its encoding tag
    async fn fetch_and_decrypt(
        &self,
        url: &str,
        logic: EncryptLogic,
        key: &ContentKey,
    ) -> Result<DecryptedFile, ClientError> {
        match logic {
            EncryptLogic::Base64 => {
                let container = self.fetcher.fetch_text(url).await?;
                Ok(DecryptedFile::Text(decrypt_string(&container, key)?))
            }
            EncryptLogic::Binary => {
                let sealed = self.fetcher.fetch_bytes(url).await?;
                Ok(DecryptedFile::Bytes(decrypt_bytes(&sealed, key)?))
            }
            EncryptLogic::Stream => {
                let sealed = self.fetcher.fetch_bytes(url).await?;
                let mut plain = Vec::new();
                decrypt_stream(Cursor::new(sealed), &mut plain, key).await?;
                Ok(DecryptedFile::Bytes(plain))
            }
        }
    }
}

fn notify(subscriber: Option<&dyn ProgressSubscriber>, step: MintStep) {
    if let Some(subscriber) = subscriber {
        subscriber.on_step(step);
    }
}

/// Upload every payload concurrently. Each upload runs to completion
/// regardless of its siblings; afterwards, any failure fails the step
/// with every failed file named (metadata must reference all locators).
async fn upload_payloads(
    uploader: &dyn ContentUploader,
    payloads: Vec<(String, EncryptedPayload)>,
    batch_id: &str,
) -> Result<Vec<String>, ClientError> {
    let results = join_all(payloads.into_iter().map(|(file_name, payload)| async move {
        uploader
            .upload_encrypted_content(&file_name, payload, batch_id)
            .await
            .map_err(|err| (file_name, err))
    }))
    .await;

    let mut urls = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(url) => urls.push(url),
            Err((file_name, err)) => {
                warn!(file = %file_name, error = %err, "content upload failed");
                failures.push(format!("{file_name}: {err}"));
            }
        }
    }

    if !failures.is_empty() {
        return Err(ClientError::ContentUpload { failures });
    }
    Ok(urls)
}
