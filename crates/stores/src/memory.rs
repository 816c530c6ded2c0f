//! Map-backed in-memory state for tests and simulation.

use crate::entities::{Nft, Token, TokenRelation};
use crate::traits::{
    ReadableAccountStore, ReadableNftStore, ReadableStoreFactory, ReadableTokenRelationStore,
    ReadableTokenStore,
};
use std::collections::HashMap;
use stratus_types::{Account, AccountId, ContractId, NftId, TokenId};

/// An immutable-once-built in-memory state snapshot.
///
/// Populated with the builder-style `with_*` methods, then used as a
/// [`ReadableStoreFactory`]. Accounts registered with an alias are indexed
/// for alias lookup automatically.
#[derive(Debug, Default)]
pub struct InMemoryState {
    accounts: HashMap<AccountId, Account>,
    aliases: HashMap<Vec<u8>, AccountId>,
    tokens: HashMap<TokenId, Token>,
    token_relations: HashMap<(AccountId, TokenId), TokenRelation>,
    nfts: HashMap<NftId, Nft>,
}

impl InMemoryState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account (or contract account) to the state.
    pub fn with_account(mut self, account: Account) -> Self {
        if let Some(alias) = &account.alias {
            self.aliases.insert(alias.clone(), account.id);
        }
        self.accounts.insert(account.id, account);
        self
    }

    /// Add a token to the state.
    pub fn with_token(mut self, token: Token) -> Self {
        self.tokens.insert(token.id, token);
        self
    }

    /// Add a token relation to the state.
    pub fn with_token_relation(mut self, relation: TokenRelation) -> Self {
        self.token_relations
            .insert((relation.account_id, relation.token_id), relation);
        self
    }

    /// Add an NFT to the state.
    pub fn with_nft(mut self, nft: Nft) -> Self {
        self.nfts.insert(nft.id, nft);
        self
    }
}

impl ReadableAccountStore for InMemoryState {
    fn get_account_by_id(&self, id: &AccountId) -> Option<Account> {
        self.accounts.get(id).cloned()
    }

    fn get_contract_by_id(&self, id: &ContractId) -> Option<Account> {
        self.accounts
            .get(&id.account_id())
            .filter(|account| account.smart_contract)
            .cloned()
    }

    fn get_account_by_alias(&self, alias: &[u8]) -> Option<Account> {
        let id = self.aliases.get(alias)?;
        self.accounts.get(id).cloned()
    }
}

impl ReadableTokenStore for InMemoryState {
    fn get_token_by_id(&self, id: &TokenId) -> Option<Token> {
        self.tokens.get(id).cloned()
    }
}

impl ReadableTokenRelationStore for InMemoryState {
    fn get_token_relation(&self, account: &AccountId, token: &TokenId) -> Option<TokenRelation> {
        self.token_relations.get(&(*account, *token)).cloned()
    }
}

impl ReadableNftStore for InMemoryState {
    fn get_nft_by_id(&self, id: &NftId) -> Option<Nft> {
        self.nfts.get(id).cloned()
    }
}

impl ReadableStoreFactory for InMemoryState {
    fn account_store(&self) -> &dyn ReadableAccountStore {
        self
    }

    fn token_store(&self) -> &dyn ReadableTokenStore {
        self
    }

    fn token_relation_store(&self) -> &dyn ReadableTokenRelationStore {
        self
    }

    fn nft_store(&self) -> &dyn ReadableNftStore {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(num: u64) -> Account {
        Account {
            id: AccountId::new(num),
            ..Account::default()
        }
    }

    #[test]
    fn test_account_lookup() {
        let state = InMemoryState::new().with_account(account(1001));
        let store = state.account_store();

        assert!(store.get_account_by_id(&AccountId::new(1001)).is_some());
        assert!(store.get_account_by_id(&AccountId::new(9999)).is_none());
    }

    #[test]
    fn test_contract_lookup_requires_contract_flag() {
        let contract = Account {
            id: AccountId::new(2002),
            smart_contract: true,
            ..Account::default()
        };
        let state = InMemoryState::new()
            .with_account(account(1001))
            .with_account(contract);
        let store = state.account_store();

        assert!(store.get_contract_by_id(&ContractId::new(2002)).is_some());
        // A plain account is not addressable as a contract.
        assert!(store.get_contract_by_id(&ContractId::new(1001)).is_none());
    }

    #[test]
    fn test_alias_lookup() {
        let aliased = Account {
            id: AccountId::new(3003),
            alias: Some(vec![0xAB; 20]),
            ..Account::default()
        };
        let state = InMemoryState::new().with_account(aliased);
        let store = state.account_store();

        let found = store.get_account_by_alias(&[0xAB; 20]).unwrap();
        assert_eq!(found.id, AccountId::new(3003));
        assert!(store.get_account_by_alias(&[0xCD; 20]).is_none());
    }

    #[test]
    fn test_token_relation_lookup() {
        let relation = TokenRelation {
            account_id: AccountId::new(1001),
            token_id: TokenId::new(5),
            frozen: false,
        };
        let state = InMemoryState::new().with_token_relation(relation.clone());

        let found = state
            .token_relation_store()
            .get_token_relation(&AccountId::new(1001), &TokenId::new(5));
        assert_eq!(found, Some(relation));
    }
}
