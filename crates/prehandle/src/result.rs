//! The immutable outcome of one pre-handle pass.

use std::collections::HashMap;
use std::sync::Arc;
use stratus_signature::{verification_for, SignatureVerification, SignatureVerificationFuture};
use stratus_types::{AccountId, EvmAlias, Key, ResponseCode, TransactionInfo};

/// Where a pre-handle pass ended up, and who is at fault if it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PreHandleStatus {
    /// Everything checked out so far; signature verifications are in
    /// flight.
    SoFarSoGood,
    /// The submitting node shipped something it should have rejected
    /// (undecodable bytes, missing transaction id). Charged to the node.
    NodeDueDiligenceFailure,
    /// Validation failed in a way the payer answers for (unknown entities,
    /// missing keys). Charged to the payer.
    PreHandleFailure,
    /// An unexpected failure inside pre-handle itself.
    UnknownFailure,
}

/// Completed and in-flight verifications, keyed by cryptographic leaf.
///
/// Compound keys are never map keys here; they are answered by composing
/// leaf futures.
pub type VerificationResults = HashMap<Key, SignatureVerificationFuture>;

/// The immutable result of pre-handling one transaction.
///
/// Safe to publish across threads: all fields are frozen at construction
/// and the futures carry their own synchronization. The consensus handling
/// stage inspects `status` first, then `response_code`, and charges fees
/// accordingly.
#[derive(Clone, Debug)]
pub struct PreHandleResult {
    status: PreHandleStatus,
    response_code: ResponseCode,
    payer: Option<AccountId>,
    payer_key: Option<Key>,
    tx_info: Option<TransactionInfo>,
    verification_results: Option<Arc<VerificationResults>>,
    inner_result: Option<Box<PreHandleResult>>,
}

impl PreHandleResult {
    /// The success-path constructor: all fields present, status
    /// [`PreHandleStatus::SoFarSoGood`]-shaped.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        status: PreHandleStatus,
        response_code: ResponseCode,
        payer: Option<AccountId>,
        payer_key: Option<Key>,
        tx_info: Option<TransactionInfo>,
        verification_results: Option<Arc<VerificationResults>>,
        inner_result: Option<Box<PreHandleResult>>,
    ) -> Self {
        Self {
            status,
            response_code,
            payer,
            payer_key,
            tx_info,
            verification_results,
            inner_result,
        }
    }

    /// A result for a failure nobody anticipated. Everything except the
    /// status and response code is empty.
    pub fn unknown_failure() -> Self {
        Self {
            status: PreHandleStatus::UnknownFailure,
            response_code: ResponseCode::Unknown,
            payer: None,
            payer_key: None,
            tx_info: None,
            verification_results: None,
            inner_result: None,
        }
    }

    /// A result for a failure the submitting node answers for. The node is
    /// recorded as the payer so it gets charged.
    pub fn node_due_diligence_failure(
        node: AccountId,
        response_code: ResponseCode,
        tx_info: Option<TransactionInfo>,
    ) -> Self {
        Self {
            status: PreHandleStatus::NodeDueDiligenceFailure,
            response_code,
            payer: Some(node),
            payer_key: None,
            tx_info,
            verification_results: None,
            inner_result: None,
        }
    }

    /// A result for a validation failure the payer answers for.
    pub fn pre_handle_failure(
        payer: AccountId,
        payer_key: Option<Key>,
        response_code: ResponseCode,
        tx_info: Option<TransactionInfo>,
        inner_result: Option<Box<PreHandleResult>>,
    ) -> Self {
        Self {
            status: PreHandleStatus::PreHandleFailure,
            response_code,
            payer: Some(payer),
            payer_key,
            tx_info,
            verification_results: None,
            inner_result,
        }
    }

    /// The pass's status.
    pub fn status(&self) -> PreHandleStatus {
        self.status
    }

    /// The response code to report.
    pub fn response_code(&self) -> ResponseCode {
        self.response_code
    }

    /// The account to charge: the payer, or the node on due-diligence
    /// failures.
    pub fn payer(&self) -> Option<AccountId> {
        self.payer
    }

    /// The payer's key, when it was resolved.
    pub fn payer_key(&self) -> Option<&Key> {
        self.payer_key.as_ref()
    }

    /// The decoded transaction, when decoding got that far.
    pub fn tx_info(&self) -> Option<&TransactionInfo> {
        self.tx_info.as_ref()
    }

    /// The dispatched verifications, on the success path.
    pub fn verification_results(&self) -> Option<&VerificationResults> {
        self.verification_results.as_deref()
    }

    /// The nested (scheduled) transaction's result, if there is one.
    pub fn inner_result(&self) -> Option<&PreHandleResult> {
        self.inner_result.as_deref()
    }

    /// A future for the verdict of an arbitrary key expression.
    ///
    /// A cryptographic leaf present in the verification map is answered
    /// with the stored future itself; compound keys get a composite that
    /// completes once the verdict is determinable. With no verification
    /// results at all (any failure path), the verdict is an immediate fail
    /// bound to the queried key.
    pub fn verification_for(&self, key: &Key) -> SignatureVerificationFuture {
        match &self.verification_results {
            Some(results) => verification_for(key, results),
            None => SignatureVerificationFuture::completed(SignatureVerification::failing(
                key.clone(),
            )),
        }
    }

    /// A future for the verdict of the hollow account with EVM alias
    /// `alias`.
    ///
    /// Scans the dispatched futures for one tagged with the alias; a hit
    /// returns that future itself, a miss an immediate fail. The scan is
    /// linear, which is fine at tens of signatures per transaction.
    pub fn verification_for_alias(&self, alias: &[u8]) -> SignatureVerificationFuture {
        if let Some(results) = &self.verification_results {
            if let Some(future) = results
                .values()
                .find(|f| f.evm_alias().is_some_and(|a| a.as_bytes()[..] == *alias))
            {
                return future.clone();
            }
        }
        SignatureVerificationFuture::completed(SignatureVerification::new(
            Key::Unset,
            EvmAlias::from_slice(alias),
            false,
        ))
    }
}
