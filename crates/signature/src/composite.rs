//! Compound-key verification by composing per-leaf futures.
//!
//! [`verification_for`] answers "will this key expression hold?" for any key
//! shape. Cryptographic leaves present in the verification map are answered
//! with the stored future itself; everything else gets a composite future
//! that folds leaf completions through the structural evaluator and
//! completes as soon as the verdict is determinable: a threshold key can
//! pass before slow children finish, and a key list fails on the first
//! failed child.

use crate::future::SignatureVerificationFuture;
use crate::verification::SignatureVerification;
use futures::future::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashMap, HashSet};
use stratus_types::{evaluate_key, Key, KeyStatus, Verdict};

/// Produce a future for the verdict of an arbitrary key expression.
///
/// The synthesized verdict is bound to the queried key. Leaves with no
/// entry in `results` count as failed; duplicate leaves share the single
/// stored future and count multiply toward thresholds.
pub fn verification_for(
    key: &Key,
    results: &HashMap<Key, SignatureVerificationFuture>,
) -> SignatureVerificationFuture {
    // A cryptographic leaf present in the map is answered with the stored
    // future itself, not a copy.
    if key.is_crypto() {
        if let Some(future) = results.get(key) {
            return future.clone();
        }
    }

    // Split leaves into already-known verdicts and still-running futures.
    let mut known: HashMap<Key, bool> = HashMap::new();
    let mut in_flight: HashSet<Key> = HashSet::new();
    let mut pending = FuturesUnordered::new();
    for leaf in key.crypto_leaves() {
        let Some(future) = results.get(&leaf) else {
            continue;
        };
        if let Some(verification) = future.peek() {
            known.insert(leaf, verification.passed());
        } else {
            in_flight.insert(leaf.clone());
            pending.push(future.clone().map(move |v| (leaf, v.passed())));
        }
    }

    let verdict = evaluate(key, &known, &in_flight);
    if verdict.is_decided() {
        return SignatureVerificationFuture::completed(SignatureVerification::new(
            key.clone(),
            None,
            verdict == Verdict::Pass,
        ));
    }

    let queried = key.clone();
    let inner = async move {
        let passed = loop {
            let verdict = evaluate(&queried, &known, &in_flight);
            if verdict.is_decided() {
                break verdict == Verdict::Pass;
            }
            match pending.next().await {
                Some((leaf, passed)) => {
                    in_flight.remove(&leaf);
                    known.insert(leaf, passed);
                }
                // All leaves resolved yet still pending cannot happen;
                // fail closed if it ever does.
                None => break false,
            }
        };
        SignatureVerification::new(queried, None, passed)
    }
    .boxed()
    .shared();

    SignatureVerificationFuture::from_shared(key.clone(), None, inner)
}

fn evaluate(key: &Key, known: &HashMap<Key, bool>, in_flight: &HashSet<Key>) -> Verdict {
    evaluate_key(key, &|leaf| match known.get(leaf) {
        Some(&passed) => KeyStatus::Verified(passed),
        None if in_flight.contains(leaf) => KeyStatus::Pending,
        None => KeyStatus::Absent,
    })
}
