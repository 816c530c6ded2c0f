//! Per-transaction-kind key gathering.
//!
//! Each transaction kind has a handler that walks the operation's entity
//! references and tells the [`PreHandleContext`] which keys and hollow
//! accounts must sign. Handlers never verify anything themselves; they only
//! gather requirements and fail fast with the response code a bad reference
//! deserves.

use crate::context::PreHandleContext;
use stratus_types::{
    CryptoTransferBody, PreCheckError, ResponseCode, TransactionData, TransferTarget,
};
use tracing::trace;

/// Gathers signing requirements for one transaction kind.
pub trait TransactionHandler: Send + Sync {
    /// Populate `context` with the keys and hollow accounts this operation
    /// requires.
    ///
    /// `dispatcher` is available for operations that wrap an inner
    /// transaction (scheduling) and need to pre-handle it recursively.
    fn pre_handle(
        &self,
        context: &mut PreHandleContext<'_>,
        dispatcher: &TransactionDispatcher,
    ) -> Result<(), PreCheckError>;
}

/// Routes a context to the handler for its transaction kind.
#[derive(Debug, Default)]
pub struct TransactionDispatcher {
    crypto_transfer: CryptoTransferHandler,
    crypto_delete: CryptoDeleteHandler,
    contract_update: ContractUpdateHandler,
    token_mint: TokenMintHandler,
    schedule_create: ScheduleCreateHandler,
}

impl TransactionDispatcher {
    /// Create a dispatcher with every kind's handler registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the handler matching the context's transaction kind.
    pub fn dispatch(&self, context: &mut PreHandleContext<'_>) -> Result<(), PreCheckError> {
        trace!(
            kind = context.body().data.kind_name(),
            payer = %context.payer(),
            "Dispatching pre-handle"
        );
        match context.body().data {
            TransactionData::CryptoTransfer(_) => self.crypto_transfer.pre_handle(context, self),
            TransactionData::CryptoDelete(_) => self.crypto_delete.pre_handle(context, self),
            TransactionData::ContractUpdate(_) => self.contract_update.pre_handle(context, self),
            TransactionData::TokenMint(_) => self.token_mint.pre_handle(context, self),
            TransactionData::ScheduleCreate(_) => self.schedule_create.pre_handle(context, self),
        }
    }
}

/// Handler for crypto transfers.
///
/// Debited accounts must sign (hollow senders sign through their alias);
/// credited accounts sign only when they insist on it via
/// `receiver_sig_required`. Credits to an unknown alias are allowed; they
/// auto-create the account at the handling stage.
#[derive(Debug, Default)]
pub struct CryptoTransferHandler;

impl CryptoTransferHandler {
    fn require_sender(
        &self,
        context: &mut PreHandleContext<'_>,
        op_target: &TransferTarget,
    ) -> Result<(), PreCheckError> {
        let store = context.store_factory().account_store();
        let account = match op_target {
            TransferTarget::Account(id) => store.get_account_by_id(id),
            TransferTarget::Alias(alias) => store.get_account_by_alias(alias),
        }
        .ok_or(PreCheckError::new(ResponseCode::InvalidTransferAccountId))?;

        if account.deleted {
            return Err(PreCheckError::new(ResponseCode::AccountDeleted));
        }
        if account.is_hollow() {
            context.require_signature_for_hollow_account(&account);
        } else {
            context.require_key_or_fail(
                account.key.as_ref(),
                ResponseCode::InvalidTransferAccountId,
            )?;
        }
        Ok(())
    }

    fn require_receiver(
        &self,
        context: &mut PreHandleContext<'_>,
        op_target: &TransferTarget,
    ) -> Result<(), PreCheckError> {
        match op_target {
            TransferTarget::Account(id) => {
                context.require_key_if_receiver_sig_required(
                    Some(id),
                    ResponseCode::InvalidTransferAccountId,
                )?;
            }
            TransferTarget::Alias(alias) => {
                // An unknown alias is an auto-creation credit; nothing to
                // require yet.
                let existing = context.store_factory().account_store().get_account_by_alias(alias);
                if let Some(account) = existing {
                    context.require_key_if_receiver_sig_required(
                        Some(&account.id),
                        ResponseCode::InvalidTransferAccountId,
                    )?;
                }
            }
        }
        Ok(())
    }
}

impl TransactionHandler for CryptoTransferHandler {
    fn pre_handle(
        &self,
        context: &mut PreHandleContext<'_>,
        _dispatcher: &TransactionDispatcher,
    ) -> Result<(), PreCheckError> {
        let TransactionData::CryptoTransfer(ref op) = context.body().data else {
            return Ok(());
        };
        let op: CryptoTransferBody = op.clone();

        for leg in &op.transfers {
            if leg.amount < 0 {
                self.require_sender(context, &leg.target)?;
            } else {
                self.require_receiver(context, &leg.target)?;
            }
        }
        Ok(())
    }
}

/// Handler for crypto deletes: the deleted account must sign, and the
/// account receiving the swept balance signs when it requires receiver
/// signatures.
#[derive(Debug, Default)]
pub struct CryptoDeleteHandler;

impl TransactionHandler for CryptoDeleteHandler {
    fn pre_handle(
        &self,
        context: &mut PreHandleContext<'_>,
        _dispatcher: &TransactionDispatcher,
    ) -> Result<(), PreCheckError> {
        let TransactionData::CryptoDelete(ref op) = context.body().data else {
            return Ok(());
        };
        let op = op.clone();

        context.require_account_key_or_fail(
            op.delete_account_id.as_ref(),
            ResponseCode::InvalidDeleteAccountId,
        )?;
        context.require_key_if_receiver_sig_required(
            op.transfer_account_id.as_ref(),
            ResponseCode::InvalidTransferAccountId,
        )?;
        Ok(())
    }
}

/// Handler for contract updates: the contract's admin key must sign.
#[derive(Debug, Default)]
pub struct ContractUpdateHandler;

impl TransactionHandler for ContractUpdateHandler {
    fn pre_handle(
        &self,
        context: &mut PreHandleContext<'_>,
        _dispatcher: &TransactionDispatcher,
    ) -> Result<(), PreCheckError> {
        let TransactionData::ContractUpdate(ref op) = context.body().data else {
            return Ok(());
        };
        let contract_id = op.contract_id;

        context
            .require_contract_key_or_fail(contract_id.as_ref(), ResponseCode::InvalidContractId)?;
        Ok(())
    }
}

/// Handler for token mints: the token's supply key must sign.
#[derive(Debug, Default)]
pub struct TokenMintHandler;

impl TransactionHandler for TokenMintHandler {
    fn pre_handle(
        &self,
        context: &mut PreHandleContext<'_>,
        _dispatcher: &TransactionDispatcher,
    ) -> Result<(), PreCheckError> {
        let TransactionData::TokenMint(ref op) = context.body().data else {
            return Ok(());
        };
        let token_id = op
            .token_id
            .ok_or(PreCheckError::new(ResponseCode::InvalidTokenId))?;

        let token = context
            .store_factory()
            .token_store()
            .get_token_by_id(&token_id)
            .ok_or(PreCheckError::new(ResponseCode::InvalidTokenId))?;
        if token.deleted {
            return Err(PreCheckError::new(ResponseCode::InvalidTokenId));
        }
        context.require_key_or_fail(
            token.supply_key.as_ref(),
            ResponseCode::TokenHasNoSupplyKey,
        )?;
        Ok(())
    }
}

/// Handler for schedule creates.
///
/// Builds the nested context for the scheduled transaction (resolving its
/// designated payer) and pre-handles the inner operation against it, so
/// the inner requirements accumulate separately from the outer ones.
#[derive(Debug, Default)]
pub struct ScheduleCreateHandler;

impl TransactionHandler for ScheduleCreateHandler {
    fn pre_handle(
        &self,
        context: &mut PreHandleContext<'_>,
        dispatcher: &TransactionDispatcher,
    ) -> Result<(), PreCheckError> {
        let TransactionData::ScheduleCreate(ref op) = context.body().data else {
            return Ok(());
        };
        let op = op.clone();

        let scheduled_payer = op.payer_account_id.unwrap_or_else(|| context.payer());
        let inner = context.create_nested_context(
            *op.scheduled,
            scheduled_payer,
            ResponseCode::InvalidScheduleAccountId,
        )?;
        dispatcher.dispatch(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_stores::InMemoryState;
    use stratus_types::{
        Account, AccountAmount, AccountId, ContractId, ContractUpdateBody, CryptoDeleteBody,
        Ed25519PublicKey, Key, ScheduleCreateBody, TransactionBody, TransactionId,
    };

    fn ed(seed: u8) -> Key {
        Key::Ed25519(Ed25519PublicKey([seed; 32]))
    }

    fn account(num: u64, key: Key) -> Account {
        Account {
            id: AccountId::new(num),
            key: Some(key),
            ..Account::default()
        }
    }

    fn body(payer: u64, data: TransactionData) -> TransactionBody {
        TransactionBody {
            transaction_id: Some(TransactionId {
                payer: AccountId::new(payer),
                valid_start_nanos: 1,
            }),
            node_account_id: Some(AccountId::new(3)),
            memo: String::new(),
            data,
        }
    }

    fn transfer(legs: Vec<AccountAmount>) -> TransactionData {
        TransactionData::CryptoTransfer(CryptoTransferBody { transfers: legs })
    }

    fn leg(num: u64, amount: i64) -> AccountAmount {
        AccountAmount {
            target: TransferTarget::Account(AccountId::new(num)),
            amount,
        }
    }

    fn base_state() -> InMemoryState {
        InMemoryState::new().with_account(account(1001, ed(1)))
    }

    fn required_keys(context: &PreHandleContext<'_>) -> Vec<Key> {
        context.required_non_payer_keys().cloned().collect()
    }

    #[test]
    fn test_transfer_debit_requires_sender_key() {
        let state = base_state().with_account(account(2002, ed(2)));
        let mut context =
            PreHandleContext::new(&state, body(1001, transfer(vec![leg(2002, -10), leg(1001, 10)])))
                .unwrap();

        TransactionDispatcher::new().dispatch(&mut context).unwrap();
        assert_eq!(required_keys(&context), vec![ed(2)]);
    }

    #[test]
    fn test_transfer_credit_requires_key_only_if_receiver_sig_required() {
        let mut fussy = account(2002, ed(2));
        fussy.receiver_sig_required = true;
        let state = base_state()
            .with_account(fussy)
            .with_account(account(2003, ed(3)));
        let mut context = PreHandleContext::new(
            &state,
            body(1001, transfer(vec![leg(1001, -20), leg(2002, 10), leg(2003, 10)])),
        )
        .unwrap();

        TransactionDispatcher::new().dispatch(&mut context).unwrap();
        // 2002 insists on signing; 2003 does not. The payer's own debit
        // requires no extra key.
        assert_eq!(required_keys(&context), vec![ed(2)]);
    }

    #[test]
    fn test_transfer_from_missing_account_fails() {
        let state = base_state();
        let mut context =
            PreHandleContext::new(&state, body(1001, transfer(vec![leg(9999, -10)]))).unwrap();

        let err = TransactionDispatcher::new()
            .dispatch(&mut context)
            .unwrap_err();
        assert_eq!(err.code, ResponseCode::InvalidTransferAccountId);
    }

    #[test]
    fn test_transfer_from_deleted_account_fails() {
        let mut gone = account(2002, ed(2));
        gone.deleted = true;
        let state = base_state().with_account(gone);
        let mut context =
            PreHandleContext::new(&state, body(1001, transfer(vec![leg(2002, -10)]))).unwrap();

        let err = TransactionDispatcher::new()
            .dispatch(&mut context)
            .unwrap_err();
        assert_eq!(err.code, ResponseCode::AccountDeleted);
    }

    #[test]
    fn test_transfer_from_hollow_account_requires_hollow_signature() {
        let hollow = Account {
            id: AccountId::new(5005),
            alias: Some(vec![0xAB; 20]),
            ..Account::default()
        };
        let state = base_state().with_account(hollow.clone());
        let mut context =
            PreHandleContext::new(&state, body(1001, transfer(vec![leg(5005, -10)]))).unwrap();

        TransactionDispatcher::new().dispatch(&mut context).unwrap();
        assert!(required_keys(&context).is_empty());
        let hollow_accounts: Vec<_> = context.required_hollow_accounts().cloned().collect();
        assert_eq!(hollow_accounts, vec![hollow]);
    }

    #[test]
    fn test_transfer_credit_to_unknown_alias_is_auto_creation() {
        let state = base_state();
        let mut context = PreHandleContext::new(
            &state,
            body(
                1001,
                transfer(vec![AccountAmount {
                    target: TransferTarget::Alias(vec![0xCD; 20]),
                    amount: 10,
                }]),
            ),
        )
        .unwrap();

        TransactionDispatcher::new().dispatch(&mut context).unwrap();
        assert!(required_keys(&context).is_empty());
    }

    #[test]
    fn test_transfer_debit_by_alias_resolves_account() {
        let mut aliased = account(2002, ed(2));
        aliased.alias = Some(vec![0xEF; 20]);
        let state = base_state().with_account(aliased);
        let mut context = PreHandleContext::new(
            &state,
            body(
                1001,
                transfer(vec![AccountAmount {
                    target: TransferTarget::Alias(vec![0xEF; 20]),
                    amount: -10,
                }]),
            ),
        )
        .unwrap();

        TransactionDispatcher::new().dispatch(&mut context).unwrap();
        assert_eq!(required_keys(&context), vec![ed(2)]);
    }

    #[test]
    fn test_crypto_delete_requirements() {
        let mut sweep_target = account(2003, ed(3));
        sweep_target.receiver_sig_required = true;
        let state = base_state()
            .with_account(account(2002, ed(2)))
            .with_account(sweep_target);
        let data = TransactionData::CryptoDelete(CryptoDeleteBody {
            delete_account_id: Some(AccountId::new(2002)),
            transfer_account_id: Some(AccountId::new(2003)),
        });
        let mut context = PreHandleContext::new(&state, body(1001, data)).unwrap();

        TransactionDispatcher::new().dispatch(&mut context).unwrap();
        assert_eq!(required_keys(&context), vec![ed(2), ed(3)]);
    }

    #[test]
    fn test_crypto_delete_missing_target_fails() {
        let state = base_state();
        let data = TransactionData::CryptoDelete(CryptoDeleteBody {
            delete_account_id: Some(AccountId::new(9999)),
            transfer_account_id: None,
        });
        let mut context = PreHandleContext::new(&state, body(1001, data)).unwrap();

        let err = TransactionDispatcher::new()
            .dispatch(&mut context)
            .unwrap_err();
        assert_eq!(err.code, ResponseCode::InvalidDeleteAccountId);
    }

    #[test]
    fn test_contract_update_requires_admin_key() {
        let contract = Account {
            id: AccountId::new(3003),
            key: Some(ed(7)),
            smart_contract: true,
            ..Account::default()
        };
        let state = base_state().with_account(contract);
        let data = TransactionData::ContractUpdate(ContractUpdateBody {
            contract_id: Some(ContractId::new(3003)),
            new_memo: Some("updated".to_string()),
        });
        let mut context = PreHandleContext::new(&state, body(1001, data)).unwrap();

        TransactionDispatcher::new().dispatch(&mut context).unwrap();
        assert_eq!(required_keys(&context), vec![ed(7)]);
    }

    #[test]
    fn test_contract_update_unknown_contract_fails() {
        let state = base_state();
        let data = TransactionData::ContractUpdate(ContractUpdateBody {
            contract_id: Some(ContractId::new(4040)),
            new_memo: None,
        });
        let mut context = PreHandleContext::new(&state, body(1001, data)).unwrap();

        let err = TransactionDispatcher::new()
            .dispatch(&mut context)
            .unwrap_err();
        assert_eq!(err.code, ResponseCode::InvalidContractId);
    }

    #[test]
    fn test_token_mint_requires_supply_key() {
        use stratus_stores::Token;
        use stratus_types::{TokenId, TokenMintBody};

        let token = Token {
            id: TokenId::new(7),
            supply_key: Some(ed(5)),
            ..Token::default()
        };
        let state = base_state().with_token(token);
        let data = TransactionData::TokenMint(TokenMintBody {
            token_id: Some(TokenId::new(7)),
            amount: 100,
        });
        let mut context = PreHandleContext::new(&state, body(1001, data)).unwrap();

        TransactionDispatcher::new().dispatch(&mut context).unwrap();
        assert_eq!(required_keys(&context), vec![ed(5)]);
    }

    #[test]
    fn test_token_mint_without_supply_key_fails() {
        use stratus_stores::Token;
        use stratus_types::{TokenId, TokenMintBody};

        let token = Token {
            id: TokenId::new(7),
            ..Token::default()
        };
        let state = base_state().with_token(token);
        let data = TransactionData::TokenMint(TokenMintBody {
            token_id: Some(TokenId::new(7)),
            amount: 100,
        });
        let mut context = PreHandleContext::new(&state, body(1001, data)).unwrap();

        let err = TransactionDispatcher::new()
            .dispatch(&mut context)
            .unwrap_err();
        assert_eq!(err.code, ResponseCode::TokenHasNoSupplyKey);
    }

    #[test]
    fn test_token_mint_unknown_token_fails() {
        use stratus_types::{TokenId, TokenMintBody};

        let state = base_state();
        let data = TransactionData::TokenMint(TokenMintBody {
            token_id: Some(TokenId::new(404)),
            amount: 1,
        });
        let mut context = PreHandleContext::new(&state, body(1001, data)).unwrap();

        let err = TransactionDispatcher::new()
            .dispatch(&mut context)
            .unwrap_err();
        assert_eq!(err.code, ResponseCode::InvalidTokenId);
    }

    #[test]
    fn test_schedule_create_builds_inner_context() {
        let state = base_state()
            .with_account(account(2002, ed(2)))
            .with_account(account(2003, ed(3)));
        let scheduled = body(2002, transfer(vec![leg(2003, -5), leg(1001, 5)]));
        let data = TransactionData::ScheduleCreate(ScheduleCreateBody {
            scheduled: Box::new(scheduled),
            payer_account_id: Some(AccountId::new(2002)),
        });
        let mut context = PreHandleContext::new(&state, body(1001, data)).unwrap();

        TransactionDispatcher::new().dispatch(&mut context).unwrap();

        let inner = context.inner_context().unwrap();
        assert_eq!(inner.payer(), AccountId::new(2002));
        // The inner transfer debits 2003, whose key the inner context
        // requires; the outer context stays clean.
        assert_eq!(required_keys(inner), vec![ed(3)]);
        assert!(required_keys(&context).is_empty());
    }

    #[test]
    fn test_schedule_create_defaults_payer_to_outer_payer() {
        let state = base_state();
        let scheduled = body(1001, transfer(vec![]));
        let data = TransactionData::ScheduleCreate(ScheduleCreateBody {
            scheduled: Box::new(scheduled),
            payer_account_id: None,
        });
        let mut context = PreHandleContext::new(&state, body(1001, data)).unwrap();

        TransactionDispatcher::new().dispatch(&mut context).unwrap();
        assert_eq!(context.inner_context().unwrap().payer(), AccountId::new(1001));
    }

    #[test]
    fn test_schedule_create_bad_inner_payer_fails() {
        let state = base_state();
        let scheduled = body(9999, transfer(vec![]));
        let data = TransactionData::ScheduleCreate(ScheduleCreateBody {
            scheduled: Box::new(scheduled),
            payer_account_id: Some(AccountId::new(9999)),
        });
        let mut context = PreHandleContext::new(&state, body(1001, data)).unwrap();

        let err = TransactionDispatcher::new()
            .dispatch(&mut context)
            .unwrap_err();
        assert_eq!(err.code, ResponseCode::InvalidScheduleAccountId);
    }
}
