//! The terminal verdict of a signature verification.

use stratus_types::{EvmAlias, Key};

/// The outcome of verifying one key against a transaction's signatures.
///
/// Terminal and immutable: once produced, a verification never changes.
/// For hollow-account verifications the recovered key's EVM alias rides
/// along so the verdict can be found by alias later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureVerification {
    key: Key,
    evm_alias: Option<EvmAlias>,
    passed: bool,
}

impl SignatureVerification {
    /// Create a verification verdict.
    pub fn new(key: Key, evm_alias: Option<EvmAlias>, passed: bool) -> Self {
        Self {
            key,
            evm_alias,
            passed,
        }
    }

    /// A passing verdict for `key`.
    pub fn passing(key: Key) -> Self {
        Self::new(key, None, true)
    }

    /// A failing verdict for `key`.
    pub fn failing(key: Key) -> Self {
        Self::new(key, None, false)
    }

    /// The key this verdict is about.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The EVM alias of the hollow account this verification backs, if any.
    pub fn evm_alias(&self) -> Option<&EvmAlias> {
        self.evm_alias.as_ref()
    }

    /// Whether the verification passed.
    pub fn passed(&self) -> bool {
        self.passed
    }
}
