//! The per-transaction pre-handle orchestrator.

use crate::context::PreHandleContext;
use crate::handlers::TransactionDispatcher;
use crate::result::{PreHandleResult, PreHandleStatus, VerificationResults};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use stratus_dispatch::Dispatch;
use stratus_signature::{expand_signatures, SignatureVerifier};
use stratus_stores::ReadableStoreFactory;
use stratus_types::{
    Account, AccountId, Key, ResponseCode, SignatureMap, TransactionInfo,
};
use tracing::{debug, trace, warn};

/// Counters for one workflow instance.
#[derive(Debug, Default)]
pub struct PreHandleWorkflowStats {
    /// Transactions pre-handled.
    pub transactions: AtomicU64,
    /// Passes that reached the success path.
    pub so_far_so_good: AtomicU64,
    /// Failures charged to the submitting node.
    pub due_diligence_failures: AtomicU64,
    /// Failures charged to the payer.
    pub pre_handle_failures: AtomicU64,
    /// Unexpected failures.
    pub unknown_failures: AtomicU64,
    /// Signature verifications dispatched.
    pub verifications_dispatched: AtomicU64,
}

/// Pre-handles transactions: decode, resolve the payer, gather required
/// keys, dispatch signature verifications, and assemble the result.
///
/// One instance serves the whole node; the external scheduler calls
/// [`PreHandleWorkflow::pre_handle_transaction`] from its worker threads,
/// one call per transaction. The call never blocks on cryptography: every
/// verification is dispatched through `D` and returned as an in-flight
/// future inside the result.
pub struct PreHandleWorkflow<D: Dispatch> {
    dispatcher: TransactionDispatcher,
    verifier: SignatureVerifier<D>,
    stats: Arc<PreHandleWorkflowStats>,
}

impl<D: Dispatch> PreHandleWorkflow<D> {
    /// Create a workflow dispatching verifications through `dispatch`.
    pub fn new(dispatch: D) -> Self {
        Self {
            dispatcher: TransactionDispatcher::new(),
            verifier: SignatureVerifier::new(dispatch),
            stats: Arc::new(PreHandleWorkflowStats::default()),
        }
    }

    /// This workflow's counters.
    pub fn stats(&self) -> &PreHandleWorkflowStats {
        &self.stats
    }

    /// Pre-handle one transaction submitted through node `creator`.
    ///
    /// Always returns exactly one result; every failure mode maps onto a
    /// result status rather than an error. A panic anywhere inside the
    /// pass is caught and reported as
    /// [`PreHandleStatus::UnknownFailure`].
    pub fn pre_handle_transaction(
        &self,
        creator: AccountId,
        store_factory: &dyn ReadableStoreFactory,
        tx_bytes: &[u8],
    ) -> PreHandleResult {
        self.stats.transactions.fetch_add(1, Ordering::Relaxed);

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.pre_handle_inner(creator, store_factory, tx_bytes)
        }));

        let result = match outcome {
            Ok(result) => result,
            Err(_) => {
                warn!("Pre-handle panicked; reporting unknown failure");
                PreHandleResult::unknown_failure()
            }
        };

        let counter = match result.status() {
            PreHandleStatus::SoFarSoGood => &self.stats.so_far_so_good,
            PreHandleStatus::NodeDueDiligenceFailure => &self.stats.due_diligence_failures,
            PreHandleStatus::PreHandleFailure => &self.stats.pre_handle_failures,
            PreHandleStatus::UnknownFailure => &self.stats.unknown_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        result
    }

    fn pre_handle_inner(
        &self,
        creator: AccountId,
        store_factory: &dyn ReadableStoreFactory,
        tx_bytes: &[u8],
    ) -> PreHandleResult {
        // 1. Decode. Undecodable bytes are the submitting node's fault.
        let tx_info = match TransactionInfo::try_from_bytes(tx_bytes) {
            Ok(info) => info,
            Err(err) => {
                debug!(node = %creator, error = %err, "Transaction failed to decode");
                return PreHandleResult::node_due_diligence_failure(
                    creator,
                    err.response_code(),
                    None,
                );
            }
        };
        trace!(tx_hash = %tx_info.tx_hash, payer = %tx_info.transaction_id.payer, "Pre-handling transaction");

        // 2. Construct the context; this resolves the payer.
        let payer = tx_info.body.payer();
        let mut context = match PreHandleContext::new(store_factory, tx_info.body.clone()) {
            Ok(context) => context,
            Err(err) => {
                debug!(%payer, code = %err.code, "Payer resolution failed");
                return PreHandleResult::pre_handle_failure(
                    payer,
                    None,
                    err.code,
                    Some(tx_info),
                    None,
                );
            }
        };

        // 3. Let the transaction kind's handler gather requirements.
        if let Err(err) = self.dispatcher.dispatch(&mut context) {
            debug!(%payer, code = %err.code, "Handler rejected transaction");
            let payer_key = context.payer_key().clone();
            return PreHandleResult::pre_handle_failure(
                payer,
                Some(payer_key),
                err.code,
                Some(tx_info),
                None,
            );
        }

        // 4. Expand signatures and dispatch one verification per distinct
        //    cryptographic leaf; never wait for completion.
        let message = Arc::new(tx_info.body_bytes.clone());
        let results = self.dispatch_verifications(&context, &tx_info.signature_map, &message);

        // 5. A scheduled inner transaction gets its own result, assembled
        //    from the nested context against the same signature map.
        let inner_result = context.inner_context().map(|inner| {
            let inner_results =
                self.dispatch_verifications(inner, &tx_info.signature_map, &message);
            Box::new(PreHandleResult::new(
                PreHandleStatus::SoFarSoGood,
                ResponseCode::Ok,
                Some(inner.payer()),
                Some(inner.payer_key().clone()),
                None,
                Some(Arc::new(inner_results)),
                None,
            ))
        });

        let payer_key = context.payer_key().clone();
        PreHandleResult::new(
            PreHandleStatus::SoFarSoGood,
            ResponseCode::Ok,
            Some(payer),
            Some(payer_key),
            Some(tx_info),
            Some(Arc::new(results)),
            inner_result,
        )
    }

    /// Dispatch verifications for every distinct cryptographic leaf
    /// reachable from the payer key and the required non-payer keys, plus
    /// every required hollow account.
    fn dispatch_verifications(
        &self,
        context: &PreHandleContext<'_>,
        signature_map: &SignatureMap,
        message: &Arc<Vec<u8>>,
    ) -> VerificationResults {
        let mut leaves: Vec<Key> = context.payer_key().crypto_leaves();
        for key in context.required_non_payer_keys() {
            for leaf in key.crypto_leaves() {
                if !leaves.contains(&leaf) {
                    leaves.push(leaf);
                }
            }
        }
        let hollow_accounts: Vec<Account> = context.required_hollow_accounts().cloned().collect();

        let expanded = expand_signatures(&leaves, &hollow_accounts, signature_map);
        trace!(
            leaves = leaves.len(),
            hollow = hollow_accounts.len(),
            matched = expanded.len(),
            "Dispatching signature verifications"
        );

        let mut results: VerificationResults = HashMap::with_capacity(expanded.len());
        for expansion in expanded {
            let future = self.verifier.verify_async(
                expansion.key.clone(),
                expansion.evm_alias,
                expansion.signature,
                Arc::clone(message),
            );
            self.stats
                .verifications_dispatched
                .fetch_add(1, Ordering::Relaxed);
            results.insert(expansion.key, future);
        }
        results
    }
}
