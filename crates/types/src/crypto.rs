//! Cryptographic key and signature primitives.
//!
//! Two signature schemes are supported at pre-handle:
//!
//! - `Ed25519` - 32-byte public keys, verified over the raw message
//! - `ECDSA secp256k1` - 33-byte compressed public keys, verified over the
//!   Keccak-256 digest of the message (EVM convention)
//!
//! Verification helpers never panic on malformed input; a key or signature
//! that fails to parse simply fails verification.

use crate::identifiers::EvmAlias;
use k256::ecdsa::signature::DigestVerifier;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use parity_scale_codec::{Decode, Encode};
use sha3::{Digest, Keccak256};
use std::fmt;

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({}..)", &hex::encode(self.0)[..8])
    }
}

/// A 33-byte compressed ECDSA secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct EcdsaSecp256k1PublicKey(pub [u8; 33]);

impl fmt::Debug for EcdsaSecp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcdsaSecp256k1PublicKey({}..)", &hex::encode(self.0)[..8])
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct Ed25519Signature(pub [u8; 64]);

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({}..)", &hex::encode(self.0)[..8])
    }
}

/// A 64-byte ECDSA secp256k1 signature (r || s, fixed width).
#[derive(Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct EcdsaSecp256k1Signature(pub [u8; 64]);

impl fmt::Debug for EcdsaSecp256k1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcdsaSecp256k1Signature({}..)", &hex::encode(self.0)[..8])
    }
}

/// Verify an Ed25519 signature over a raw message.
///
/// Returns `false` for malformed keys or signatures rather than erroring;
/// the pre-handle engine treats verification failure and malformed input
/// identically.
pub fn verify_ed25519(message: &[u8], pubkey: &Ed25519PublicKey, sig: &Ed25519Signature) -> bool {
    let Ok(vk) = ed25519_dalek::VerifyingKey::from_bytes(&pubkey.0) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(&sig.0);
    vk.verify_strict(message, &signature).is_ok()
}

/// Verify an ECDSA secp256k1 signature over the Keccak-256 digest of a
/// message.
///
/// Returns `false` for malformed keys or signatures rather than erroring.
pub fn verify_ecdsa_secp256k1(
    message: &[u8],
    pubkey: &EcdsaSecp256k1PublicKey,
    sig: &EcdsaSecp256k1Signature,
) -> bool {
    let Ok(vk) = k256::ecdsa::VerifyingKey::from_sec1_bytes(&pubkey.0) else {
        return false;
    };
    let Ok(signature) = k256::ecdsa::Signature::from_slice(&sig.0) else {
        return false;
    };
    vk.verify_digest(Keccak256::new_with_prefix(message), &signature)
        .is_ok()
}

/// Derive the 20-byte EVM address of a compressed secp256k1 public key.
///
/// The address is the last 20 bytes of the Keccak-256 digest of the
/// uncompressed (65-byte) point, skipping the 0x04 tag. Returns `None` when
/// the bytes are not a valid curve point.
pub fn evm_address_of(pubkey: &EcdsaSecp256k1PublicKey) -> Option<EvmAlias> {
    let point = k256::PublicKey::from_sec1_bytes(&pubkey.0).ok()?;
    let uncompressed = point.to_encoded_point(false);
    let digest = Keccak256::digest(&uncompressed.as_bytes()[1..]);
    EvmAlias::from_slice(&digest[12..])
}

/// Derive a deterministic Ed25519 signing key from a seed.
///
/// Used by fixtures and simulation; different seeds produce different keys.
pub fn ed25519_keypair_from_seed(seed: &[u8; 32]) -> ed25519_dalek::SigningKey {
    ed25519_dalek::SigningKey::from_bytes(seed)
}

/// Derive a deterministic ECDSA secp256k1 signing key from a seed.
///
/// Hashes the seed until the result is a valid curve scalar, so the
/// function is total over all seeds.
pub fn ecdsa_keypair_from_seed(seed: &[u8; 32]) -> k256::ecdsa::SigningKey {
    let mut material = *seed;
    loop {
        let candidate = blake3::hash(&material);
        if let Ok(sk) = k256::ecdsa::SigningKey::from_slice(candidate.as_bytes()) {
            return sk;
        }
        material = *candidate.as_bytes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::signature::DigestSigner;

    fn ed25519_pair(seed: u8) -> (ed25519_dalek::SigningKey, Ed25519PublicKey) {
        let sk = ed25519_keypair_from_seed(&[seed; 32]);
        let pk = Ed25519PublicKey(sk.verifying_key().to_bytes());
        (sk, pk)
    }

    fn ecdsa_pair(seed: u8) -> (k256::ecdsa::SigningKey, EcdsaSecp256k1PublicKey) {
        let sk = ecdsa_keypair_from_seed(&[seed; 32]);
        let point = sk.verifying_key().to_encoded_point(true);
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(point.as_bytes());
        (sk, EcdsaSecp256k1PublicKey(bytes))
    }

    #[test]
    fn test_ed25519_sign_verify() {
        use ed25519_dalek::Signer;
        let (sk, pk) = ed25519_pair(1);
        let message = b"test message";
        let sig = Ed25519Signature(sk.sign(message).to_bytes());
        assert!(verify_ed25519(message, &pk, &sig));
    }

    #[test]
    fn test_ed25519_verify_fails_wrong_message() {
        use ed25519_dalek::Signer;
        let (sk, pk) = ed25519_pair(1);
        let sig = Ed25519Signature(sk.sign(b"test message").to_bytes());
        assert!(!verify_ed25519(b"wrong message", &pk, &sig));
    }

    #[test]
    fn test_ecdsa_sign_verify() {
        let (sk, pk) = ecdsa_pair(2);
        let message = b"test message";
        let sig: k256::ecdsa::Signature = sk.sign_digest(Keccak256::new_with_prefix(message));
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&sig.to_bytes());
        let sig = EcdsaSecp256k1Signature(bytes);
        assert!(verify_ecdsa_secp256k1(message, &pk, &sig));
        assert!(!verify_ecdsa_secp256k1(b"wrong", &pk, &sig));
    }

    #[test]
    fn test_malformed_ecdsa_key_fails_quietly() {
        let sig = EcdsaSecp256k1Signature([0u8; 64]);
        let bogus = EcdsaSecp256k1PublicKey([0xFF; 33]);
        assert!(!verify_ecdsa_secp256k1(b"msg", &bogus, &sig));
    }

    #[test]
    fn test_evm_address_is_deterministic() {
        let (_, pk) = ecdsa_pair(3);
        let a = evm_address_of(&pk).unwrap();
        let b = evm_address_of(&pk).unwrap();
        assert_eq!(a, b);

        let (_, other) = ecdsa_pair(4);
        assert_ne!(a, evm_address_of(&other).unwrap());
    }

    #[test]
    fn test_evm_address_rejects_invalid_point() {
        let bogus = EcdsaSecp256k1PublicKey([0xFF; 33]);
        assert!(evm_address_of(&bogus).is_none());
    }

    #[test]
    fn test_keypair_from_seed_deterministic() {
        let a = ecdsa_keypair_from_seed(&[7; 32]);
        let b = ecdsa_keypair_from_seed(&[7; 32]);
        assert_eq!(a.verifying_key(), b.verifying_key());

        let c = ecdsa_keypair_from_seed(&[8; 32]);
        assert_ne!(a.verifying_key(), c.verifying_key());
    }
}
