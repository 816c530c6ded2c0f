//! Account state as seen by pre-handle.

use crate::identifiers::{AccountId, EvmAlias};
use crate::key::Key;

/// A read-only view of an account's pre-handle-relevant state.
///
/// Pre-handle only inspects identity, keys, and signature-requirement flags;
/// balances and expiry live with the handling stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Account {
    /// The account's id.
    pub id: AccountId,
    /// The account's key. `None` on special system accounts and on hollow
    /// accounts whose key has not been learned yet.
    pub key: Option<Key>,
    /// Raw alias bytes, if the account has one. A 20-byte alias is an EVM
    /// address.
    pub alias: Option<Vec<u8>>,
    /// Whether transfers *to* this account require its signature.
    pub receiver_sig_required: bool,
    /// Whether the account has been deleted.
    pub deleted: bool,
    /// Whether this account backs a smart contract.
    pub smart_contract: bool,
}

impl Account {
    /// Whether this is a hollow account.
    ///
    /// A hollow account carries a 20-byte EVM alias and no usable key (the
    /// wire sentinel is an empty key list or no key at all). Its signature
    /// requirement is expressed through the alias until the key is learned.
    pub fn is_hollow(&self) -> bool {
        let aliased = matches!(&self.alias, Some(alias) if alias.len() == EvmAlias::BYTES);
        let keyless = match &self.key {
            None => true,
            Some(key) => key.is_empty_key_list() || matches!(key, Key::Unset),
        };
        aliased && keyless
    }

    /// The account's EVM alias, when its alias bytes are address-shaped.
    pub fn evm_alias(&self) -> Option<EvmAlias> {
        self.alias.as_deref().and_then(EvmAlias::from_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519PublicKey;

    fn aliased(alias_len: usize, key: Option<Key>) -> Account {
        Account {
            id: AccountId::new(1001),
            key,
            alias: Some(vec![0xAB; alias_len]),
            ..Account::default()
        }
    }

    #[test]
    fn test_hollow_requires_20_byte_alias() {
        assert!(aliased(20, None).is_hollow());
        assert!(!aliased(19, None).is_hollow());
        assert!(!aliased(32, None).is_hollow());
    }

    #[test]
    fn test_hollow_requires_missing_or_sentinel_key() {
        assert!(aliased(20, Some(Key::KeyList(vec![]))).is_hollow());
        assert!(aliased(20, Some(Key::Unset)).is_hollow());

        let keyed = aliased(20, Some(Key::Ed25519(Ed25519PublicKey([1; 32]))));
        assert!(!keyed.is_hollow());
    }

    #[test]
    fn test_no_alias_is_not_hollow() {
        let account = Account {
            id: AccountId::new(2),
            ..Account::default()
        };
        assert!(!account.is_hollow());
    }

    #[test]
    fn test_evm_alias_only_for_address_shaped_bytes() {
        assert!(aliased(20, None).evm_alias().is_some());
        assert!(aliased(33, None).evm_alias().is_none());
    }
}
