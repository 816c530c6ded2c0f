//! A cloneable handle to an eventually-completed signature verification.

use crate::verification::SignatureVerification;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use stratus_types::{EvmAlias, Key};
use tokio::sync::oneshot;

type SharedVerification = Shared<BoxFuture<'static, SignatureVerification>>;

/// An in-flight signature verification.
///
/// Created already-scheduled and always completes: if the verification
/// engine drops its sender (a bug or shutdown), awaiting resolves to a
/// failed verdict rather than hanging. Clones share one underlying
/// computation, so every holder observes the same verdict; there is no
/// cancellation.
#[derive(Clone)]
pub struct SignatureVerificationFuture {
    key: Key,
    evm_alias: Option<EvmAlias>,
    inner: SharedVerification,
}

impl SignatureVerificationFuture {
    /// A future that is already complete with `verification`.
    pub fn completed(verification: SignatureVerification) -> Self {
        let key = verification.key().clone();
        let evm_alias = verification.evm_alias().copied();
        let inner = futures::future::ready(verification).boxed().shared();
        Self {
            key,
            evm_alias,
            inner,
        }
    }

    /// A future fed by a verification task through a oneshot channel.
    ///
    /// If the sender is dropped without a verdict, the future resolves to a
    /// failed verification for `key`.
    pub fn from_receiver(
        key: Key,
        evm_alias: Option<EvmAlias>,
        rx: oneshot::Receiver<SignatureVerification>,
    ) -> Self {
        let fallback_key = key.clone();
        let inner = async move {
            match rx.await {
                Ok(verification) => verification,
                Err(_) => SignatureVerification::new(fallback_key, evm_alias, false),
            }
        }
        .boxed()
        .shared();
        Self {
            key,
            evm_alias,
            inner,
        }
    }

    /// A future wrapping an arbitrary verification computation.
    ///
    /// Used by the composite evaluator; `key` is the (possibly compound)
    /// key the synthesized verdict will be bound to.
    pub(crate) fn from_shared(
        key: Key,
        evm_alias: Option<EvmAlias>,
        inner: SharedVerification,
    ) -> Self {
        Self {
            key,
            evm_alias,
            inner,
        }
    }

    /// The key this future will produce a verdict for.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The EVM alias of the hollow account this verification backs, if any.
    pub fn evm_alias(&self) -> Option<&EvmAlias> {
        self.evm_alias.as_ref()
    }

    /// Whether the verdict is already available.
    pub fn is_done(&self) -> bool {
        self.inner.peek().is_some()
    }

    /// The verdict, if already available.
    pub fn peek(&self) -> Option<&SignatureVerification> {
        self.inner.peek()
    }

    /// Whether two handles share the same underlying computation.
    ///
    /// Distinguishes "the stored future itself" from "an equal but distinct
    /// future"; map lookups hand back the former.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl Future for SignatureVerificationFuture {
    type Output = SignatureVerification;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

impl std::fmt::Debug for SignatureVerificationFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerificationFuture")
            .field("key", &self.key)
            .field("evm_alias", &self.evm_alias)
            .field("done", &self.is_done())
            .finish()
    }
}
