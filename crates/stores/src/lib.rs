//! Read-only store façades over ledger state.
//!
//! Pre-handle runs before consensus ordering, so it must never mutate state;
//! it reads one snapshot per pass through the façades defined here. The
//! closed set of stores covers exactly the entities pre-handle can touch:
//! accounts (including contracts and alias resolution), tokens, token
//! relations, and NFTs.
//!
//! # Snapshot consistency
//!
//! A [`ReadableStoreFactory`] hands out stores backed by a single state
//! snapshot. All lookups made during one pre-handle pass observe that
//! snapshot; mutations happen only at consensus-ordered handling, so no
//! locking is needed.
//!
//! [`InMemoryState`] provides a map-backed snapshot for tests and
//! simulation.

mod entities;
mod memory;
mod traits;

pub use entities::{Nft, Token, TokenRelation};
pub use memory::InMemoryState;
pub use traits::{
    ReadableAccountStore, ReadableNftStore, ReadableStoreFactory, ReadableTokenRelationStore,
    ReadableTokenStore,
};
