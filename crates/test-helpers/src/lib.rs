//! Test fixtures for Stratus pre-handle: deterministic keypairs, accounts,
//! and properly-signed transaction envelopes.
//!
//! Everything here derives from seeds, so tests exercising real
//! cryptographic verification stay reproducible. The fixture builders sign
//! exactly what the workflow verifies (the encoded body bytes), making
//! end-to-end pass/fail outcomes meaningful.
//!
//! # Example
//!
//! ```rust
//! use stratus_test_helpers::{fixtures, TestKeypair};
//!
//! let alice = TestKeypair::ed25519(1);
//! let body = fixtures::transfer_body(1001, vec![]);
//! let bytes = fixtures::signed_transaction(&body, &[&alice]);
//!
//! // The envelope decodes and the signature verifies against the body bytes.
//! let info = stratus_types::TransactionInfo::try_from_bytes(&bytes).unwrap();
//! assert_eq!(info.body, body);
//! ```

pub mod fixtures;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};
use stratus_types::{
    ecdsa_keypair_from_seed, ed25519_keypair_from_seed, evm_address_of, EcdsaSecp256k1PublicKey,
    EcdsaSecp256k1Signature, Ed25519PublicKey, Ed25519Signature, EvmAlias, Key, Signature,
    SignaturePair,
};

/// A deterministic test keypair of either supported scheme.
pub enum TestKeypair {
    /// An Ed25519 signing key.
    Ed25519(ed25519_dalek::SigningKey),
    /// An ECDSA secp256k1 signing key.
    Ecdsa(k256::ecdsa::SigningKey),
}

impl TestKeypair {
    /// Deterministic Ed25519 keypair for `seed`.
    pub fn ed25519(seed: u8) -> Self {
        Self::Ed25519(ed25519_keypair_from_seed(&[seed; 32]))
    }

    /// Deterministic ECDSA secp256k1 keypair for `seed`.
    pub fn ecdsa(seed: u8) -> Self {
        Self::Ecdsa(ecdsa_keypair_from_seed(&[seed; 32]))
    }

    /// The public key as a [`Key`] leaf.
    pub fn public_key(&self) -> Key {
        match self {
            Self::Ed25519(sk) => Key::Ed25519(Ed25519PublicKey(sk.verifying_key().to_bytes())),
            Self::Ecdsa(sk) => {
                let point = sk.verifying_key().to_encoded_point(true);
                let mut bytes = [0u8; 33];
                bytes.copy_from_slice(point.as_bytes());
                Key::EcdsaSecp256k1(EcdsaSecp256k1PublicKey(bytes))
            }
        }
    }

    /// The raw public key bytes.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match self.public_key() {
            Key::Ed25519(pk) => pk.0.to_vec(),
            Key::EcdsaSecp256k1(pk) => pk.0.to_vec(),
            _ => unreachable!("test keypairs are always cryptographic leaves"),
        }
    }

    /// The EVM alias derived from an ECDSA public key; `None` for Ed25519.
    pub fn evm_alias(&self) -> Option<EvmAlias> {
        match self.public_key() {
            Key::EcdsaSecp256k1(pk) => evm_address_of(&pk),
            _ => None,
        }
    }

    /// Sign `message` the way the verification engine expects: raw bytes
    /// for Ed25519, Keccak-256 prehash for ECDSA.
    pub fn sign(&self, message: &[u8]) -> Signature {
        match self {
            Self::Ed25519(sk) => {
                use ed25519_dalek::Signer;
                Signature::Ed25519(Ed25519Signature(sk.sign(message).to_bytes()))
            }
            Self::Ecdsa(sk) => {
                use k256::ecdsa::signature::DigestSigner;
                let sig: k256::ecdsa::Signature =
                    sk.sign_digest(Keccak256::new_with_prefix(message));
                let mut bytes = [0u8; 64];
                bytes.copy_from_slice(&sig.to_bytes());
                Signature::EcdsaSecp256k1(EcdsaSecp256k1Signature(bytes))
            }
        }
    }

    /// A signature pair carrying the full public key.
    pub fn signature_pair(&self, message: &[u8]) -> SignaturePair {
        SignaturePair {
            pub_key_prefix: self.public_key_bytes(),
            signature: self.sign(message),
        }
    }

    /// A signature pair with the public key truncated to `prefix_len`
    /// bytes.
    pub fn signature_pair_with_prefix(&self, message: &[u8], prefix_len: usize) -> SignaturePair {
        let mut pair = self.signature_pair(message);
        pair.pub_key_prefix.truncate(prefix_len);
        pair
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_types::{verify_ecdsa_secp256k1, verify_ed25519};

    #[test]
    fn test_keypairs_are_deterministic() {
        assert_eq!(
            TestKeypair::ed25519(1).public_key(),
            TestKeypair::ed25519(1).public_key()
        );
        assert_ne!(
            TestKeypair::ed25519(1).public_key(),
            TestKeypair::ed25519(2).public_key()
        );
        assert_ne!(
            TestKeypair::ecdsa(1).public_key(),
            TestKeypair::ecdsa(2).public_key()
        );
    }

    #[test]
    fn test_signatures_verify() {
        let message = b"payload";

        let alice = TestKeypair::ed25519(1);
        let (Key::Ed25519(pk), Signature::Ed25519(sig)) =
            (alice.public_key(), alice.sign(message))
        else {
            panic!("scheme mismatch");
        };
        assert!(verify_ed25519(message, &pk, &sig));

        let erin = TestKeypair::ecdsa(2);
        let (Key::EcdsaSecp256k1(pk), Signature::EcdsaSecp256k1(sig)) =
            (erin.public_key(), erin.sign(message))
        else {
            panic!("scheme mismatch");
        };
        assert!(verify_ecdsa_secp256k1(message, &pk, &sig));
    }

    #[test]
    fn test_only_ecdsa_has_alias() {
        assert!(TestKeypair::ecdsa(1).evm_alias().is_some());
        assert!(TestKeypair::ed25519(1).evm_alias().is_none());
    }
}
