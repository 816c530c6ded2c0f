//! Entity views served by the token-family stores.

use stratus_types::{AccountId, Key, NftId, TokenId};

/// A read-only view of a token type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Token {
    /// The token's id.
    pub id: TokenId,
    /// Key allowed to update the token, if any.
    pub admin_key: Option<Key>,
    /// Key allowed to mint/burn supply, if any.
    pub supply_key: Option<Key>,
    /// Whether the token has been deleted.
    pub deleted: bool,
}

/// A read-only view of one account's relationship to one token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRelation {
    /// The account side of the relationship.
    pub account_id: AccountId,
    /// The token side of the relationship.
    pub token_id: TokenId,
    /// Whether the account's token balance is frozen.
    pub frozen: bool,
}

/// A read-only view of a single NFT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nft {
    /// The NFT's id.
    pub id: NftId,
    /// Current owner.
    pub owner_id: AccountId,
}
