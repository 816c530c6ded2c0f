//! Core types for the Stratus transaction pre-handle core.
//!
//! This crate provides the foundational types used throughout pre-handle and
//! signature verification:
//!
//! - **Primitives**: Hash, cryptographic keys and signatures
//! - **Identifiers**: AccountId, ContractId, TokenId, EvmAlias, etc.
//! - **Key model**: the recursive [`Key`] sum type and its structural
//!   evaluator [`evaluate_key`]
//! - **Entities**: [`Account`] with hollow-account detection
//! - **Transactions**: body, signature map, signed envelope, decode
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not depend
//! on any other workspace crates, making it the foundation layer.

mod account;
mod crypto;
mod hash;
mod identifiers;
mod key;
mod response_code;
mod transaction;

pub use account::Account;
pub use crypto::{
    ecdsa_keypair_from_seed,
    ed25519_keypair_from_seed,
    evm_address_of,
    verify_ecdsa_secp256k1,
    verify_ed25519,
    EcdsaSecp256k1PublicKey,
    EcdsaSecp256k1Signature,
    Ed25519PublicKey,
    Ed25519Signature,
};
pub use hash::Hash;
pub use identifiers::{AccountId, ContractId, EvmAlias, NftId, TokenId, TransactionId};
pub use key::{evaluate_key, Key, KeyStatus, Verdict};
pub use response_code::{PreCheckError, ResponseCode};
pub use transaction::{
    AccountAmount, ContractUpdateBody, CryptoDeleteBody, CryptoTransferBody, ScheduleCreateBody,
    Signature, SignatureMap, SignaturePair, SignedTransaction, TokenMintBody, TransactionBody,
    TransactionData, TransactionDecodeError, TransactionInfo, TransferTarget,
};
