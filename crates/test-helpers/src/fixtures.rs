//! Account, transaction, and future fixtures.

use crate::TestKeypair;
use parity_scale_codec::Encode;
use stratus_signature::{SignatureVerification, SignatureVerificationFuture};
use stratus_types::{
    Account, AccountAmount, AccountId, CryptoTransferBody, EvmAlias, Key, SignatureMap,
    SignedTransaction, TransactionBody, TransactionData, TransactionId, TransferTarget,
};

/// An account whose key is `key`.
pub fn account_with_key(num: u64, key: Key) -> Account {
    Account {
        id: AccountId::new(num),
        key: Some(key),
        ..Account::default()
    }
}

/// A hollow account aliased to `keypair`'s EVM address.
///
/// # Panics
///
/// Panics if `keypair` is not ECDSA (only ECDSA keys have addresses).
pub fn hollow_account(num: u64, keypair: &TestKeypair) -> Account {
    let alias = keypair
        .evm_alias()
        .expect("hollow accounts need an ECDSA keypair");
    Account {
        id: AccountId::new(num),
        alias: Some(alias.as_bytes().to_vec()),
        ..Account::default()
    }
}

/// A transaction body with payer `payer` and the given payload.
pub fn transaction_body(payer: u64, data: TransactionData) -> TransactionBody {
    TransactionBody {
        transaction_id: Some(TransactionId {
            payer: AccountId::new(payer),
            valid_start_nanos: 1_000,
        }),
        node_account_id: Some(AccountId::new(3)),
        memo: String::new(),
        data,
    }
}

/// A crypto-transfer body with the given legs.
pub fn transfer_body(payer: u64, transfers: Vec<AccountAmount>) -> TransactionBody {
    transaction_body(
        payer,
        TransactionData::CryptoTransfer(CryptoTransferBody { transfers }),
    )
}

/// A transfer leg debiting (negative) or crediting (positive) an account.
pub fn leg(num: u64, amount: i64) -> AccountAmount {
    AccountAmount {
        target: TransferTarget::Account(AccountId::new(num)),
        amount,
    }
}

/// Encode `body` and wrap it in a signed envelope, with one full-key
/// signature pair per signer.
pub fn signed_transaction(body: &TransactionBody, signers: &[&TestKeypair]) -> Vec<u8> {
    let body_bytes = body.encode();
    let sig_pairs = signers
        .iter()
        .map(|keypair| keypair.signature_pair(&body_bytes))
        .collect();
    SignedTransaction {
        body_bytes,
        sig_map: SignatureMap { sig_pairs },
    }
    .to_bytes()
}

/// An envelope whose signature pairs are supplied directly.
pub fn signed_transaction_with_sig_map(body: &TransactionBody, sig_map: SignatureMap) -> Vec<u8> {
    SignedTransaction {
        body_bytes: body.encode(),
        sig_map,
    }
    .to_bytes()
}

/// An already-completed passing verification future for `key`.
pub fn good_future(key: Key) -> SignatureVerificationFuture {
    SignatureVerificationFuture::completed(SignatureVerification::passing(key))
}

/// An already-completed failing verification future for `key`.
pub fn bad_future(key: Key) -> SignatureVerificationFuture {
    SignatureVerificationFuture::completed(SignatureVerification::failing(key))
}

/// An already-completed future carrying a hollow-account alias.
pub fn future_with_alias(key: Key, alias: EvmAlias, passed: bool) -> SignatureVerificationFuture {
    SignatureVerificationFuture::completed(SignatureVerification::new(key, Some(alias), passed))
}
