//! The mutable per-transaction builder populated during key gathering.

use indexmap::IndexSet;
use stratus_stores::ReadableStoreFactory;
use stratus_types::{
    Account, AccountId, ContractId, Key, PreCheckError, ResponseCode, TransactionBody,
};

/// Per-transaction pre-handle state, owned by one worker thread.
///
/// Constructed once per transaction (and once more per nested scheduled
/// transaction), mutated only during the handler's key-gathering phase,
/// then read by the workflow when it assembles the
/// [`crate::PreHandleResult`].
///
/// The require-operations chain through `Result<&mut Self, _>`, so a
/// handler can write
/// `context.require_key_or_fail(key, code)?.require_key(other);`.
pub struct PreHandleContext<'a> {
    store_factory: &'a dyn ReadableStoreFactory,
    body: TransactionBody,
    payer: AccountId,
    payer_key: Key,
    required_non_payer_keys: IndexSet<Key>,
    required_hollow_accounts: IndexSet<Account>,
    inner: Option<Box<PreHandleContext<'a>>>,
}

impl<'a> PreHandleContext<'a> {
    /// Create a context for `body`, resolving the payer named in its
    /// transaction id.
    ///
    /// Fails with `INVALID_PAYER_ACCOUNT_ID` when the payer account is
    /// missing or carries no usable key. Special system accounts with no
    /// key can never pay.
    pub fn new(
        store_factory: &'a dyn ReadableStoreFactory,
        body: TransactionBody,
    ) -> Result<Self, PreCheckError> {
        let payer = body.payer();
        Self::new_with_payer(
            store_factory,
            body,
            payer,
            ResponseCode::InvalidPayerAccountId,
        )
    }

    /// Create a context with an explicit payer, failing with
    /// `response_code` when the payer cannot be resolved. Used for nested
    /// (scheduled) transactions whose payer is designated by the outer
    /// transaction.
    pub fn new_with_payer(
        store_factory: &'a dyn ReadableStoreFactory,
        body: TransactionBody,
        payer: AccountId,
        response_code: ResponseCode,
    ) -> Result<Self, PreCheckError> {
        let account = store_factory
            .account_store()
            .get_account_by_id(&payer)
            .ok_or(PreCheckError::new(response_code))?;
        let payer_key = account
            .key
            .filter(Key::is_valid)
            .ok_or(PreCheckError::new(response_code))?;

        Ok(Self {
            store_factory,
            body,
            payer,
            payer_key,
            required_non_payer_keys: IndexSet::new(),
            required_hollow_accounts: IndexSet::new(),
            inner: None,
        })
    }

    /// The store factory backing this pass's snapshot.
    pub fn store_factory(&self) -> &'a dyn ReadableStoreFactory {
        self.store_factory
    }

    /// The transaction body being pre-handled.
    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    /// The payer account id.
    pub fn payer(&self) -> AccountId {
        self.payer
    }

    /// The payer's key, as found in state.
    pub fn payer_key(&self) -> &Key {
        &self.payer_key
    }

    /// Required non-payer keys, in first-required order.
    pub fn required_non_payer_keys(&self) -> impl Iterator<Item = &Key> {
        self.required_non_payer_keys.iter()
    }

    /// Required hollow accounts, in first-required order.
    pub fn required_hollow_accounts(&self) -> impl Iterator<Item = &Account> {
        self.required_hollow_accounts.iter()
    }

    /// The nested context for a scheduled transaction, if one was created.
    pub fn inner_context(&self) -> Option<&PreHandleContext<'a>> {
        self.inner.as_deref()
    }

    /// Require `key` to sign, unless it is the payer key (which always
    /// signs) or not valid.
    ///
    /// Duplicates are collapsed by structural equality, keeping the first
    /// insertion's position.
    pub fn require_key(&mut self, key: &Key) -> &mut Self {
        if key.is_valid() && *key != self.payer_key {
            self.required_non_payer_keys.insert(key.clone());
        }
        self
    }

    /// Require `key` to sign, failing with `response_code` when it is
    /// missing or not valid.
    pub fn require_key_or_fail(
        &mut self,
        key: Option<&Key>,
        response_code: ResponseCode,
    ) -> Result<&mut Self, PreCheckError> {
        match key {
            Some(key) if key.is_valid() => Ok(self.require_key(key)),
            _ => Err(PreCheckError::new(response_code)),
        }
    }

    /// Require the key of the account `account_id`, failing with
    /// `response_code` when the id is missing, the account unknown, or its
    /// key unusable.
    pub fn require_account_key_or_fail(
        &mut self,
        account_id: Option<&AccountId>,
        response_code: ResponseCode,
    ) -> Result<&mut Self, PreCheckError> {
        let id = account_id.ok_or(PreCheckError::new(response_code))?;
        let account = self
            .store_factory
            .account_store()
            .get_account_by_id(id)
            .ok_or(PreCheckError::new(response_code))?;
        self.require_key_or_fail(account.key.as_ref(), response_code)
    }

    /// Require the admin key of the contract `contract_id`, failing with
    /// `response_code` when the id is missing, the contract unknown, or its
    /// key unusable.
    pub fn require_contract_key_or_fail(
        &mut self,
        contract_id: Option<&ContractId>,
        response_code: ResponseCode,
    ) -> Result<&mut Self, PreCheckError> {
        let id = contract_id.ok_or(PreCheckError::new(response_code))?;
        let account = self
            .store_factory
            .account_store()
            .get_contract_by_id(id)
            .ok_or(PreCheckError::new(response_code))?;
        self.require_key_or_fail(account.key.as_ref(), response_code)
    }

    /// Require the key of `account_id` only when that account has
    /// `receiver_sig_required` set.
    ///
    /// A missing or sentinel id is a no-op. An id that names no account
    /// fails with `response_code`; so does a signature-requiring account
    /// whose key is missing or unset.
    pub fn require_key_if_receiver_sig_required(
        &mut self,
        account_id: Option<&AccountId>,
        response_code: ResponseCode,
    ) -> Result<&mut Self, PreCheckError> {
        let Some(id) = account_id else {
            return Ok(self);
        };
        if id.is_default() {
            return Ok(self);
        }
        let account = self
            .store_factory
            .account_store()
            .get_account_by_id(id)
            .ok_or(PreCheckError::new(response_code))?;
        if !account.receiver_sig_required {
            return Ok(self);
        }
        match account.key.as_ref() {
            None | Some(Key::Unset) => Err(PreCheckError::new(response_code)),
            Some(key) => Ok(self.require_key(key)),
        }
    }

    /// Contract flavor of
    /// [`PreHandleContext::require_key_if_receiver_sig_required`].
    pub fn require_contract_key_if_receiver_sig_required(
        &mut self,
        contract_id: Option<&ContractId>,
        response_code: ResponseCode,
    ) -> Result<&mut Self, PreCheckError> {
        let Some(id) = contract_id else {
            return Ok(self);
        };
        let account = self
            .store_factory
            .account_store()
            .get_contract_by_id(id)
            .ok_or(PreCheckError::new(response_code))?;
        if !account.receiver_sig_required {
            return Ok(self);
        }
        match account.key.as_ref() {
            Some(key) if key.is_valid() => Ok(self.require_key(key)),
            _ => Err(PreCheckError::new(response_code)),
        }
    }

    /// Require a signature locating `account` by its EVM alias.
    ///
    /// # Panics
    ///
    /// Panics if `account` is not hollow. Passing a keyed account here is a
    /// handler bug, not a validation failure, and must not be reported as
    /// one.
    pub fn require_signature_for_hollow_account(&mut self, account: &Account) -> &mut Self {
        assert!(
            account.is_hollow(),
            "account {} is not a hollow account",
            account.id
        );
        self.required_hollow_accounts.insert(account.clone());
        self
    }

    /// Create the nested context for a scheduled transaction and store it
    /// as this context's inner context.
    ///
    /// The nested payer is resolved exactly like a top-level payer, but
    /// failures surface as `response_code`.
    pub fn create_nested_context(
        &mut self,
        body: TransactionBody,
        payer: AccountId,
        response_code: ResponseCode,
    ) -> Result<&mut PreHandleContext<'a>, PreCheckError> {
        let inner = PreHandleContext::new_with_payer(self.store_factory, body, payer, response_code)?;
        Ok(self.inner.insert(Box::new(inner)))
    }
}

impl std::fmt::Debug for PreHandleContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreHandleContext")
            .field("payer", &self.payer)
            .field("payer_key", &self.payer_key)
            .field("required_non_payer_keys", &self.required_non_payer_keys)
            .field("required_hollow_accounts", &self.required_hollow_accounts)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
