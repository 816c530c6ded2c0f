//! The recursive key model and its structural evaluator.
//!
//! A [`Key`] is a value tree: cryptographic leaves (Ed25519, ECDSA), contract
//! leaves, and the compound `KeyList` / `Threshold` forms that nest
//! arbitrarily. Keys arrive from a tree-shaped wire format, so no cycles are
//! possible and plain ownership is enough.
//!
//! [`evaluate_key`] answers "does this key expression hold?" against a lookup
//! of per-leaf verification outcomes, returning pass, fail, or pending. It is
//! the single source of truth for compound-key semantics; the asynchronous
//! composite futures fold their completions through it.

use crate::crypto::{EcdsaSecp256k1PublicKey, Ed25519PublicKey};
use crate::identifiers::ContractId;
use parity_scale_codec::{Decode, Encode};

/// A key expression controlling an account or entity.
///
/// Structural equality (`Eq`/`Hash`) is the canonical key equality used for
/// deduplication; the wire encoding derives from the same structure, so the
/// two never disagree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum Key {
    /// An Ed25519 public key leaf.
    Ed25519(Ed25519PublicKey),
    /// A compressed ECDSA secp256k1 public key leaf.
    EcdsaSecp256k1(EcdsaSecp256k1PublicKey),
    /// A contract id; satisfied out-of-band by contract execution, never by
    /// a signature.
    Contract(ContractId),
    /// Like [`Key::Contract`], but also satisfied when the contract is the
    /// delegate of a call.
    DelegatableContract(ContractId),
    /// An ordered list of keys that must all be satisfied.
    KeyList(Vec<Key>),
    /// At least `threshold` of `keys` must be satisfied. The stored
    /// threshold may be out of range; it is clamped at evaluation.
    Threshold {
        /// Raw wire threshold, clamped to `1..=keys.len()` when evaluated.
        threshold: i32,
        /// The candidate keys, duplicates permitted.
        keys: Vec<Key>,
    },
    /// A key that was not set on the wire. Never valid, never satisfied.
    Unset,
}

impl Key {
    /// Convenience constructor for a threshold key.
    pub fn threshold(threshold: i32, keys: Vec<Key>) -> Self {
        Key::Threshold { threshold, keys }
    }

    /// Whether this key is structurally valid.
    ///
    /// `Unset` is invalid, an empty `KeyList` (or an empty threshold list)
    /// is invalid, and compound keys are valid only if every nested key is.
    pub fn is_valid(&self) -> bool {
        match self {
            Key::Ed25519(_) | Key::EcdsaSecp256k1(_) => true,
            Key::Contract(_) | Key::DelegatableContract(_) => true,
            Key::KeyList(keys) | Key::Threshold { keys, .. } => {
                !keys.is_empty() && keys.iter().all(Key::is_valid)
            }
            Key::Unset => false,
        }
    }

    /// Whether this key is a cryptographic leaf.
    pub fn is_crypto(&self) -> bool {
        matches!(self, Key::Ed25519(_) | Key::EcdsaSecp256k1(_))
    }

    /// Whether this key is an empty key list.
    ///
    /// An empty key list is the wire sentinel marking a hollow account's
    /// not-yet-learned key.
    pub fn is_empty_key_list(&self) -> bool {
        matches!(self, Key::KeyList(keys) if keys.is_empty())
    }

    /// The distinct cryptographic leaves reachable from this key, in
    /// first-visit order.
    ///
    /// Duplicate leaves appear once; contract leaves and `Unset` are
    /// skipped. This is the set of signatures worth dispatching for the key.
    pub fn crypto_leaves(&self) -> Vec<Key> {
        let mut leaves = Vec::new();
        self.collect_crypto_leaves(&mut leaves);
        leaves
    }

    fn collect_crypto_leaves(&self, out: &mut Vec<Key>) {
        match self {
            Key::Ed25519(_) | Key::EcdsaSecp256k1(_) => {
                if !out.contains(self) {
                    out.push(self.clone());
                }
            }
            Key::KeyList(keys) | Key::Threshold { keys, .. } => {
                for key in keys {
                    key.collect_crypto_leaves(out);
                }
            }
            Key::Contract(_) | Key::DelegatableContract(_) | Key::Unset => {}
        }
    }
}

/// Effective threshold after clamping: `min(max(t, 1), n)`.
fn clamp_threshold(threshold: i32, n: usize) -> usize {
    (threshold.max(1) as usize).min(n)
}

/// Outcome of looking up a single cryptographic leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyStatus {
    /// The leaf's verification completed with the given result.
    Verified(bool),
    /// The leaf's verification has been dispatched but has not completed.
    Pending,
    /// No verification exists for the leaf. Treated as failed.
    Absent,
}

/// Verdict of evaluating a key expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The key expression is satisfied.
    Pass,
    /// The key expression cannot be satisfied by the available outcomes.
    Fail,
    /// Not yet determinable; at least one relevant leaf is still pending.
    Pending,
}

impl Verdict {
    /// Whether this verdict is final.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Verdict::Pending)
    }
}

/// Evaluate a key expression against per-leaf verification outcomes.
///
/// Duplicate sub-keys count multiply toward a threshold: the same leaf
/// appearing twice contributes two passes once its single verification
/// passes. Contract leaves and `Unset` always fail here; contract keys are
/// honoured out-of-band at the handling stage, not by signatures.
pub fn evaluate_key<F>(key: &Key, lookup: &F) -> Verdict
where
    F: Fn(&Key) -> KeyStatus,
{
    match key {
        Key::Ed25519(_) | Key::EcdsaSecp256k1(_) => match lookup(key) {
            KeyStatus::Verified(true) => Verdict::Pass,
            KeyStatus::Verified(false) | KeyStatus::Absent => Verdict::Fail,
            KeyStatus::Pending => Verdict::Pending,
        },
        Key::Contract(_) | Key::DelegatableContract(_) | Key::Unset => Verdict::Fail,
        Key::KeyList(keys) => {
            if keys.is_empty() {
                return Verdict::Fail;
            }
            let mut pending = false;
            for child in keys {
                match evaluate_key(child, lookup) {
                    Verdict::Fail => return Verdict::Fail,
                    Verdict::Pending => pending = true,
                    Verdict::Pass => {}
                }
            }
            if pending {
                Verdict::Pending
            } else {
                Verdict::Pass
            }
        }
        Key::Threshold { threshold, keys } => {
            let n = keys.len();
            if n == 0 {
                return Verdict::Fail;
            }
            let required = clamp_threshold(*threshold, n);
            let mut passes = 0usize;
            let mut fails = 0usize;
            for child in keys {
                match evaluate_key(child, lookup) {
                    Verdict::Pass => {
                        passes += 1;
                        if passes >= required {
                            return Verdict::Pass;
                        }
                    }
                    Verdict::Fail => {
                        fails += 1;
                        if n - fails < required {
                            return Verdict::Fail;
                        }
                    }
                    Verdict::Pending => {}
                }
            }
            Verdict::Pending
        }
    }
}
