//! Scheduling of per-signature cryptographic checks.

use crate::future::SignatureVerificationFuture;
use crate::verification::SignatureVerification;
use std::sync::Arc;
use stratus_dispatch::Dispatch;
use stratus_types::{verify_ecdsa_secp256k1, verify_ed25519, EvmAlias, Key, Signature};
use tokio::sync::oneshot;
use tracing::trace;

/// Schedules signature verifications on the verification pool.
///
/// Each call dispatches exactly one check and returns an already-scheduled
/// future. The future always completes; a scheme mismatch, malformed key,
/// or engine error all resolve to a failed verdict rather than an error.
#[derive(Clone)]
pub struct SignatureVerifier<D: Dispatch> {
    dispatch: D,
}

impl<D: Dispatch> SignatureVerifier<D> {
    /// Create a verifier scheduling onto `dispatch`.
    pub fn new(dispatch: D) -> Self {
        Self { dispatch }
    }

    /// Verify `signature` by `key` over `message`, asynchronously.
    ///
    /// `evm_alias` tags verifications that back a hollow account, so the
    /// eventual verdict can be located by alias. The workflow never waits
    /// on the returned future; later stages do.
    pub fn verify_async(
        &self,
        key: Key,
        evm_alias: Option<EvmAlias>,
        signature: Signature,
        message: Arc<Vec<u8>>,
    ) -> SignatureVerificationFuture {
        let (tx, rx) = oneshot::channel();
        let future = SignatureVerificationFuture::from_receiver(key.clone(), evm_alias, rx);

        self.dispatch.spawn_verification(move || {
            let passed = check_signature(&key, &signature, &message);
            trace!(?key, passed, "Signature verification completed");
            // The receiver may already be dropped if the result was abandoned.
            let _ = tx.send(SignatureVerification::new(key, evm_alias, passed));
        });

        future
    }
}

/// Run one signature check. Scheme mismatches and compound keys fail.
fn check_signature(key: &Key, signature: &Signature, message: &[u8]) -> bool {
    match (key, signature) {
        (Key::Ed25519(pk), Signature::Ed25519(sig)) => verify_ed25519(message, pk, sig),
        (Key::EcdsaSecp256k1(pk), Signature::EcdsaSecp256k1(sig)) => {
            verify_ecdsa_secp256k1(message, pk, sig)
        }
        _ => false,
    }
}
