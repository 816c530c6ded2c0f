//! Matching submitted signature pairs to required keys and hollow aliases.
//!
//! Clients submit each signature alongside the public key that produced it,
//! possibly truncated to a prefix. Expansion resolves, before anything is
//! dispatched:
//!
//! - for each required cryptographic leaf, the signature pair whose prefix
//!   uniquely identifies that key
//! - for each required hollow account, the full ECDSA key in the map whose
//!   derived EVM address equals the account's alias
//!
//! A key without a matching pair simply gets no verification dispatched; the
//! compound evaluation then fails for it. An ambiguous prefix (matching more
//! than one pair) backs nothing.

use stratus_types::{evm_address_of, Account, EvmAlias, Key, Signature, SignatureMap};
use tracing::debug;

/// One signature resolved to the key (and possibly hollow alias) it backs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedSignature {
    /// The cryptographic leaf the signature claims to satisfy.
    pub key: Key,
    /// The hollow-account alias this signature backs, if any.
    pub evm_alias: Option<EvmAlias>,
    /// The signature to verify.
    pub signature: Signature,
}

/// The raw public key bytes of a cryptographic leaf.
fn key_bytes(key: &Key) -> Option<&[u8]> {
    match key {
        Key::Ed25519(pk) => Some(&pk.0),
        Key::EcdsaSecp256k1(pk) => Some(&pk.0),
        _ => None,
    }
}

/// Whether a signature's scheme matches a leaf's scheme.
fn scheme_matches(key: &Key, signature: &Signature) -> bool {
    matches!(
        (key, signature),
        (Key::Ed25519(_), Signature::Ed25519(_))
            | (Key::EcdsaSecp256k1(_), Signature::EcdsaSecp256k1(_))
    )
}

/// Find the signature backing a required leaf, by unique prefix match.
fn signature_for_key(key: &Key, sig_map: &SignatureMap) -> Option<Signature> {
    let bytes = key_bytes(key)?;
    let mut found: Option<&Signature> = None;
    for pair in &sig_map.sig_pairs {
        if !scheme_matches(key, &pair.signature) || !bytes.starts_with(&pair.pub_key_prefix) {
            continue;
        }
        if found.is_some() {
            debug!(?key, "Ambiguous signature prefix; key gets no signature");
            return None;
        }
        found = Some(&pair.signature);
    }
    found.cloned()
}

/// Find the full-key ECDSA signature whose derived address equals `alias`.
fn signature_for_alias(alias: &EvmAlias, sig_map: &SignatureMap) -> Option<ExpandedSignature> {
    for pair in &sig_map.sig_pairs {
        let Signature::EcdsaSecp256k1(_) = pair.signature else {
            continue;
        };
        // Only a full 33-byte key can have its address derived.
        let Ok(full) = <[u8; 33]>::try_from(pair.pub_key_prefix.as_slice()) else {
            continue;
        };
        let pk = stratus_types::EcdsaSecp256k1PublicKey(full);
        if evm_address_of(&pk) == Some(*alias) {
            return Some(ExpandedSignature {
                key: Key::EcdsaSecp256k1(pk),
                evm_alias: Some(*alias),
                signature: pair.signature.clone(),
            });
        }
    }
    None
}

/// Resolve signature pairs for every required leaf and hollow account.
///
/// `leaves` are the distinct cryptographic leaves to cover (payer plus
/// required non-payer keys, already deduplicated). The result preserves
/// leaf order, then hollow-account order; when a hollow account's recovered
/// key coincides with a required leaf, the single entry carries the alias.
pub fn expand_signatures(
    leaves: &[Key],
    hollow_accounts: &[Account],
    sig_map: &SignatureMap,
) -> Vec<ExpandedSignature> {
    let mut expanded: Vec<ExpandedSignature> = Vec::with_capacity(leaves.len());

    for leaf in leaves {
        if let Some(signature) = signature_for_key(leaf, sig_map) {
            expanded.push(ExpandedSignature {
                key: leaf.clone(),
                evm_alias: None,
                signature,
            });
        } else {
            debug!(key = ?leaf, "No signature submitted for required key");
        }
    }

    for account in hollow_accounts {
        let Some(alias) = account.evm_alias() else {
            continue;
        };
        let Some(resolved) = signature_for_alias(&alias, sig_map) else {
            debug!(%alias, "No signature resolves to hollow account alias");
            continue;
        };
        if let Some(existing) = expanded.iter_mut().find(|e| e.key == resolved.key) {
            existing.evm_alias = Some(alias);
        } else {
            expanded.push(resolved);
        }
    }

    expanded
}
