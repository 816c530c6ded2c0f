//! Transaction model and wire codec.
//!
//! A transaction arrives as SCALE-encoded [`SignedTransaction`] bytes: the
//! serialized body plus a map of signatures over those body bytes. Decoding
//! distinguishes two failure classes that pre-handle charges to the
//! submitting node:
//!
//! - malformed envelope -> `INVALID_TRANSACTION`
//! - missing/undecodable body or missing transaction id -> `INVALID_TRANSACTION_BODY`

use crate::crypto::{EcdsaSecp256k1Signature, Ed25519Signature};
use crate::hash::Hash;
use crate::identifiers::{AccountId, ContractId, TokenId, TransactionId};
use crate::response_code::ResponseCode;
use parity_scale_codec::{Decode, Encode};
use thiserror::Error;

/// Target of a transfer leg: a known account id, or a 20-byte alias for
/// accounts addressed by EVM address (including not-yet-created hollow
/// accounts).
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum TransferTarget {
    /// An account addressed by id.
    Account(AccountId),
    /// An account addressed by alias bytes.
    Alias(Vec<u8>),
}

/// One leg of a crypto transfer. Negative amounts debit, positive credit.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct AccountAmount {
    /// Who is debited or credited.
    pub target: TransferTarget,
    /// Signed amount in tinybars.
    pub amount: i64,
}

/// Body of a crypto transfer.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct CryptoTransferBody {
    /// Transfer legs; debits and credits must balance, checked at handling.
    pub transfers: Vec<AccountAmount>,
}

/// Body of a crypto delete: remove an account, sweeping its balance.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct CryptoDeleteBody {
    /// The account being deleted.
    pub delete_account_id: Option<AccountId>,
    /// Where the deleted account's balance goes.
    pub transfer_account_id: Option<AccountId>,
}

/// Body of a contract update.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct ContractUpdateBody {
    /// The contract being updated.
    pub contract_id: Option<ContractId>,
    /// New memo, if changing.
    pub new_memo: Option<String>,
}

/// Body of a token mint.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct TokenMintBody {
    /// The token whose supply grows.
    pub token_id: Option<TokenId>,
    /// Amount to mint, in the token's smallest denomination.
    pub amount: u64,
}

/// Body of a schedule create, wrapping an inner transaction to be executed
/// later once its signatures accumulate.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct ScheduleCreateBody {
    /// The transaction being scheduled.
    pub scheduled: Box<TransactionBody>,
    /// Designated payer for the scheduled transaction; defaults to the
    /// scheduling payer when absent.
    pub payer_account_id: Option<AccountId>,
}

/// The transaction-kind-specific payload.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum TransactionData {
    /// Move value between accounts.
    CryptoTransfer(CryptoTransferBody),
    /// Delete an account.
    CryptoDelete(CryptoDeleteBody),
    /// Update a contract's mutable fields.
    ContractUpdate(ContractUpdateBody),
    /// Mint token supply.
    TokenMint(TokenMintBody),
    /// Schedule an inner transaction for deferred execution.
    ScheduleCreate(ScheduleCreateBody),
}

impl TransactionData {
    /// Short name of the transaction kind, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TransactionData::CryptoTransfer(_) => "CryptoTransfer",
            TransactionData::CryptoDelete(_) => "CryptoDelete",
            TransactionData::ContractUpdate(_) => "ContractUpdate",
            TransactionData::TokenMint(_) => "TokenMint",
            TransactionData::ScheduleCreate(_) => "ScheduleCreate",
        }
    }
}

/// A transaction body: routing metadata plus the kind-specific payload.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct TransactionBody {
    /// Identity of the transaction; names the payer. Required for
    /// submission, optional on the wire.
    pub transaction_id: Option<TransactionId>,
    /// The node the client submitted to.
    pub node_account_id: Option<AccountId>,
    /// Free-form memo.
    pub memo: String,
    /// Kind-specific payload.
    pub data: TransactionData,
}

impl TransactionBody {
    /// The payer named in the transaction id, or the default sentinel when
    /// the id is missing.
    pub fn payer(&self) -> AccountId {
        self.transaction_id
            .map(|id| id.payer)
            .unwrap_or(AccountId::DEFAULT)
    }
}

/// A single signature over the body bytes.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum Signature {
    /// Ed25519 signature.
    Ed25519(Ed25519Signature),
    /// ECDSA secp256k1 signature.
    EcdsaSecp256k1(EcdsaSecp256k1Signature),
}

/// A signature paired with (a prefix of) the public key that produced it.
///
/// Clients may truncate the key to a unique prefix to save bytes; expansion
/// matches prefixes back to required keys.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct SignaturePair {
    /// Full public key bytes, or a prefix of them.
    pub pub_key_prefix: Vec<u8>,
    /// The signature over the body bytes.
    pub signature: Signature,
}

/// All signatures submitted with a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct SignatureMap {
    /// The submitted pairs, in client order.
    pub sig_pairs: Vec<SignaturePair>,
}

/// The wire envelope: serialized body plus signatures over those bytes.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct SignedTransaction {
    /// SCALE-encoded [`TransactionBody`].
    pub body_bytes: Vec<u8>,
    /// Signatures over `body_bytes`.
    pub sig_map: SignatureMap,
}

impl SignedTransaction {
    /// Encode this envelope to wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode()
    }
}

/// Why transaction bytes failed to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransactionDecodeError {
    /// The outer envelope is not decodable.
    #[error("malformed transaction envelope")]
    MalformedEnvelope,
    /// The envelope decoded, but the body bytes are empty or undecodable.
    #[error("missing or malformed transaction body")]
    MalformedBody,
    /// The body decoded but carries no transaction id.
    #[error("transaction body has no transaction id")]
    MissingTransactionId,
}

impl TransactionDecodeError {
    /// The response code this decode failure surfaces as.
    pub fn response_code(&self) -> ResponseCode {
        match self {
            TransactionDecodeError::MalformedEnvelope => ResponseCode::InvalidTransaction,
            TransactionDecodeError::MalformedBody | TransactionDecodeError::MissingTransactionId => {
                ResponseCode::InvalidTransactionBody
            }
        }
    }
}

/// A fully decoded transaction, ready for pre-handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInfo {
    /// The decoded body.
    pub body: TransactionBody,
    /// The transaction's id (guaranteed present after decode).
    pub transaction_id: TransactionId,
    /// The submitted signatures.
    pub signature_map: SignatureMap,
    /// The body bytes the signatures cover.
    pub body_bytes: Vec<u8>,
    /// Blake3 hash of the full wire bytes, for logs and dedup.
    pub tx_hash: Hash,
}

impl TransactionInfo {
    /// Decode wire bytes into a [`TransactionInfo`].
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, TransactionDecodeError> {
        let signed = SignedTransaction::decode(&mut &bytes[..])
            .map_err(|_| TransactionDecodeError::MalformedEnvelope)?;
        if signed.body_bytes.is_empty() {
            return Err(TransactionDecodeError::MalformedBody);
        }
        let body = TransactionBody::decode(&mut &signed.body_bytes[..])
            .map_err(|_| TransactionDecodeError::MalformedBody)?;
        let transaction_id = body
            .transaction_id
            .ok_or(TransactionDecodeError::MissingTransactionId)?;
        Ok(Self {
            body,
            transaction_id,
            signature_map: signed.sig_map,
            body_bytes: signed.body_bytes,
            tx_hash: Hash::from_bytes(bytes),
        })
    }
}
