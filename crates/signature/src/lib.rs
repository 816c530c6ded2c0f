//! Asynchronous signature verification.
//!
//! This crate owns everything between "these signatures arrived with the
//! transaction" and "did this key expression hold?":
//!
//! - [`SignatureVerification`]: the terminal verdict for one key
//! - [`SignatureVerificationFuture`]: a cloneable, always-completing handle
//!   to an in-flight verification
//! - [`SignatureVerifier`]: schedules per-signature checks on the
//!   verification pool
//! - [`expand_signatures`]: matches submitted signature pairs to required
//!   keys and hollow-account aliases
//! - [`verification_for`]: composes per-leaf futures into a verdict for an
//!   arbitrary compound key expression
//!
//! # Data flow
//!
//! ```text
//! SignatureMap ──expand──► ExpandedSignature* ──verify_async──► Future*
//!                                                                 │
//! verification_for(compound key) ◄───── folds completions ────────┘
//! ```

#![warn(missing_docs)]

mod composite;
mod expansion;
mod future;
mod verification;
mod verifier;

pub use composite::verification_for;
pub use expansion::{expand_signatures, ExpandedSignature};
pub use future::SignatureVerificationFuture;
pub use verification::SignatureVerification;
pub use verifier::SignatureVerifier;
