//! Ownership gating
//!
//! Decides whether a caller gets the decrypt path or only public
//! metadata. Two separate truths feed the decision: who owns the token
//! now, and who minted it originally. Both grant decryption — a minter
//! may legitimately re-derive content after transferring the token away.

use tokenveil_core::{Address, ContractError, TokenContract, TokenId};

/// A caller's standing toward a token, computed fresh from chain state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Current owner of the token
    Owner,
    /// Original minter, regardless of current ownership
    Minter,
    /// Neither: public metadata only
    Neither,
}

impl AccessLevel {
    /// Whether this level grants the decrypt path
    pub fn may_decrypt(&self) -> bool {
        matches!(self, AccessLevel::Owner | AccessLevel::Minter)
    }
}

/// Classify `caller` against current chain state.
///
/// Never cached: ownership can change between calls, so every request
/// re-reads the chain.
pub async fn classify(
    contract: &dyn TokenContract,
    token_id: TokenId,
    caller: &Address,
) -> Result<AccessLevel, ContractError> {
    if contract.owner_of(token_id).await? == *caller {
        return Ok(AccessLevel::Owner);
    }
    if contract.minter_of(token_id).await? == *caller {
        return Ok(AccessLevel::Minter);
    }
    Ok(AccessLevel::Neither)
}
