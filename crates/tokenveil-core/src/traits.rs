//! Collaborator traits for the Tokenveil SDK
//!
//! The SDK orchestrates, it does not own: wallets, chain bindings and
//! storage backends are supplied behind these seams at construction time.
//!
//! ## Key Traits
//!
//! - [`Signer`]: wallet capability (chain id, address, message signing)
//! - [`TokenContract`]: the on-chain read/write surface for the token
//! - [`ContentUploader`] / [`MetadataUploader`]: storage callbacks
//! - [`ProgressSubscriber`]: pure observer of registration steps

use async_trait::async_trait;

use crate::content::{ContentInput, EncryptedPayload};
use crate::error::{ContractError, SignerError, StorageError};
use crate::id::{Address, ChainId, DocumentId, Signature, TokenId};
use crate::metadata::PlainMetadata;

/// Wallet capability interface.
///
/// One concrete provider is selected at construction; the SDK never probes
/// provider kinds per call.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Chain the wallet is connected to
    async fn chain_id(&self) -> Result<ChainId, SignerError>;

    /// Address of the active account
    async fn address(&self) -> Result<Address, SignerError>;

    /// Sign an arbitrary message with the active account.
    ///
    /// May prompt the user; callers cache the result per challenge text.
    async fn sign_message(&self, message: &str) -> Result<Signature, SignerError>;
}

/// Fee settings passed through to the contract binding, opaque to the SDK.
///
/// Either a legacy `gas_price` or the EIP-1559 pair; the binding decides
/// what to do when neither is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GasSettings {
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

/// On-chain surface of the gated-content token contract.
///
/// Invoked, never reimplemented: transaction construction, gas selection
/// and receipt parsing belong to the binding behind this trait.
#[async_trait]
pub trait TokenContract: Send + Sync {
    /// Address of the bound contract
    fn contract_address(&self) -> Address;

    /// Mint a token for a new encrypted document.
    ///
    /// `decrypt_url` is the key-custody endpoint recorded on chain so
    /// third parties can locate the key service.
    async fn mint(
        &self,
        decrypt_url: &str,
        royalty_numerator: u32,
        document_id: &DocumentId,
        gas: Option<&GasSettings>,
    ) -> Result<TokenId, ContractError>;

    /// Mint with a pre-uploaded metadata locator (content-addressed storage
    /// needs the locator at mint time).
    async fn mint_with_metadata(
        &self,
        metadata_url: &str,
        decrypt_url: &str,
        royalty_numerator: u32,
        document_id: &DocumentId,
        gas: Option<&GasSettings>,
    ) -> Result<TokenId, ContractError>;

    /// Metadata locator for a token (`tokenURI`)
    async fn metadata_url(&self, token_id: TokenId) -> Result<String, ContractError>;

    /// Current owner of a token
    async fn owner_of(&self, token_id: TokenId) -> Result<Address, ContractError>;

    /// Original minter of a token. Distinct from the current owner; both
    /// truths matter to access decisions.
    async fn minter_of(&self, token_id: TokenId) -> Result<Address, ContractError>;

    /// Document id bound to a token at mint time
    async fn document_id_of(&self, token_id: TokenId) -> Result<DocumentId, ContractError>;

    /// Token ids currently owned by an address
    async fn tokens_of_owner(&self, owner: &Address) -> Result<Vec<TokenId>, ContractError>;

    /// Token ids originally minted by an address
    async fn tokens_of_minter(&self, minter: &Address) -> Result<Vec<TokenId>, ContractError>;

    async fn approve(
        &self,
        operator: &Address,
        token_id: TokenId,
        gas: Option<&GasSettings>,
    ) -> Result<(), ContractError>;

    async fn approved_for(&self, token_id: TokenId) -> Result<Address, ContractError>;

    async fn set_approval_for_all(
        &self,
        operator: &Address,
        gas: Option<&GasSettings>,
    ) -> Result<(), ContractError>;

    async fn is_approved_for_all(
        &self,
        owner: &Address,
        operator: &Address,
    ) -> Result<bool, ContractError>;

    async fn safe_transfer_from(
        &self,
        from: &Address,
        to: &Address,
        token_id: TokenId,
        gas: Option<&GasSettings>,
    ) -> Result<(), ContractError>;
}

/// Storage callback for encrypted content and thumbnails.
///
/// Locators returned here are opaque to the SDK; they are recorded in
/// metadata verbatim.
#[async_trait]
pub trait ContentUploader: Send + Sync {
    /// Upload one encrypted file; `batch_id` groups the files of one
    /// registration so backends can co-locate them.
    async fn upload_encrypted_content(
        &self,
        file_name: &str,
        payload: EncryptedPayload,
        batch_id: &str,
    ) -> Result<String, StorageError>;

    /// Upload the world-readable thumbnail
    async fn upload_thumbnail(
        &self,
        image: ContentInput,
        batch_id: &str,
    ) -> Result<String, StorageError>;
}

/// Storage callback for the metadata document
#[async_trait]
pub trait MetadataUploader: Send + Sync {
    /// Store metadata keyed by token id (the contract's `tokenURI` already
    /// points at it)
    async fn upload_metadata(
        &self,
        token_id: TokenId,
        metadata: &PlainMetadata,
    ) -> Result<(), StorageError>;

    /// Store metadata content-addressed and return its locator, for flows
    /// that mint with the locator. Backends that only support token-keyed
    /// storage keep the default.
    async fn upload_metadata_document(
        &self,
        _metadata: &PlainMetadata,
    ) -> Result<String, StorageError> {
        Err(StorageError::Unsupported("content-addressed metadata"))
    }
}

/// Steps of the managed registration flow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStep {
    MintToken,
    CreateKey,
    EncryptContent,
    UploadContent,
    UploadMetadata,
    RegisterKey,
}

/// Observer of registration progress.
///
/// Notified after each step completes. Purely informational: it never
/// gates or reorders the flow.
pub trait ProgressSubscriber: Send + Sync {
    fn on_step(&self, step: MintStep);
}
