//! Store façade traits.
//!
//! Every lookup is by id or alias; no store exposes iteration. Absence is
//! `None`, never an error: a missing entity is an ordinary outcome that
//! handlers map to their own response codes.

use crate::entities::{Nft, Token, TokenRelation};
use stratus_types::{Account, AccountId, ContractId, NftId, TokenId};

/// Read-only access to accounts, contracts, and alias resolution.
pub trait ReadableAccountStore {
    /// Look up an account by id.
    fn get_account_by_id(&self, id: &AccountId) -> Option<Account>;

    /// Look up the account backing a contract id.
    ///
    /// Returns `None` when the id is unknown or the account is not a
    /// contract.
    fn get_contract_by_id(&self, id: &ContractId) -> Option<Account>;

    /// Look up an account by its alias bytes.
    fn get_account_by_alias(&self, alias: &[u8]) -> Option<Account>;
}

/// Read-only access to token types.
pub trait ReadableTokenStore {
    /// Look up a token by id.
    fn get_token_by_id(&self, id: &TokenId) -> Option<Token>;
}

/// Read-only access to account-token relationships.
pub trait ReadableTokenRelationStore {
    /// Look up the relationship between an account and a token.
    fn get_token_relation(&self, account: &AccountId, token: &TokenId) -> Option<TokenRelation>;
}

/// Read-only access to NFTs.
pub trait ReadableNftStore {
    /// Look up an NFT by id.
    fn get_nft_by_id(&self, id: &NftId) -> Option<Nft>;
}

/// Hands out snapshot-consistent read-only stores for one pre-handle pass.
///
/// The factory itself is the seam between pre-handle and the node's state
/// layer: production backs it with the latest committed state, tests with
/// [`crate::InMemoryState`].
pub trait ReadableStoreFactory: Send + Sync {
    /// The account/contract/alias store.
    fn account_store(&self) -> &dyn ReadableAccountStore;

    /// The token store.
    fn token_store(&self) -> &dyn ReadableTokenStore;

    /// The token-relation store.
    fn token_relation_store(&self) -> &dyn ReadableTokenRelationStore;

    /// The NFT store.
    fn nft_store(&self) -> &dyn ReadableNftStore;
}
