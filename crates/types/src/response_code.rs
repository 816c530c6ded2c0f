//! Response codes surfaced by pre-handle, and the pre-check error that
//! carries them.

use std::fmt;
use thiserror::Error;

/// Outcome codes reported to the handling stage and back to clients.
///
/// Pre-handle itself produces the first five; the remainder come from
/// per-transaction handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// Success.
    Ok,
    /// Uncaught-failure fallback.
    Unknown,
    /// The transaction envelope could not be decoded.
    InvalidTransaction,
    /// The envelope decoded but its body is missing or malformed.
    InvalidTransactionBody,
    /// The payer account is missing or has no usable key.
    InvalidPayerAccountId,
    /// A referenced account does not exist or is unusable.
    InvalidAccountId,
    /// A referenced contract does not exist or is unusable.
    InvalidContractId,
    /// A transfer names an account that cannot receive or send.
    InvalidTransferAccountId,
    /// A crypto-delete names a missing or undeletable account.
    InvalidDeleteAccountId,
    /// The account referenced has been deleted.
    AccountDeleted,
    /// A scheduled transaction's designated payer is unusable.
    InvalidScheduleAccountId,
    /// A required signer's key cannot be resolved.
    UnresolvableRequiredSigners,
    /// A referenced token does not exist or has been deleted.
    InvalidTokenId,
    /// The token referenced by a mint or burn has no supply key.
    TokenHasNoSupplyKey,
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseCode::Ok => "OK",
            ResponseCode::Unknown => "UNKNOWN",
            ResponseCode::InvalidTransaction => "INVALID_TRANSACTION",
            ResponseCode::InvalidTransactionBody => "INVALID_TRANSACTION_BODY",
            ResponseCode::InvalidPayerAccountId => "INVALID_PAYER_ACCOUNT_ID",
            ResponseCode::InvalidAccountId => "INVALID_ACCOUNT_ID",
            ResponseCode::InvalidContractId => "INVALID_CONTRACT_ID",
            ResponseCode::InvalidTransferAccountId => "INVALID_TRANSFER_ACCOUNT_ID",
            ResponseCode::InvalidDeleteAccountId => "INVALID_DELETE_ACCOUNT_ID",
            ResponseCode::AccountDeleted => "ACCOUNT_DELETED",
            ResponseCode::InvalidScheduleAccountId => "INVALID_SCHEDULE_ACCOUNT_ID",
            ResponseCode::UnresolvableRequiredSigners => "UNRESOLVABLE_REQUIRED_SIGNERS",
            ResponseCode::InvalidTokenId => "INVALID_TOKEN_ID",
            ResponseCode::TokenHasNoSupplyKey => "TOKEN_HAS_NO_SUPPLY_KEY",
        };
        f.write_str(name)
    }
}

/// A validation failure detected during pre-handle.
///
/// Thrown by context operations and transaction handlers, caught only at the
/// workflow boundary, and mapped onto the failing result there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("pre-check failed: {code}")]
pub struct PreCheckError {
    /// The response code to report for this failure.
    pub code: ResponseCode,
}

impl PreCheckError {
    /// Create a pre-check error carrying `code`.
    pub fn new(code: ResponseCode) -> Self {
        Self { code }
    }
}

impl From<ResponseCode> for PreCheckError {
    fn from(code: ResponseCode) -> Self {
        Self { code }
    }
}
