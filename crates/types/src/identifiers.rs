//! Entity identifiers.
//!
//! All on-ledger entities are addressed by a `shard.realm.num` triple. The
//! pre-handle core only ever compares and looks these up; allocation happens
//! at the consensus handling stage.

use parity_scale_codec::{Decode, Encode};
use std::fmt;

/// Identifier of an account, `shard.realm.num`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct AccountId {
    /// Shard number.
    pub shard: u64,
    /// Realm number.
    pub realm: u64,
    /// Account number within the realm.
    pub num: u64,
}

impl AccountId {
    /// The default (all-zero) account id, used as an "unset" sentinel in
    /// transaction bodies.
    pub const DEFAULT: Self = Self {
        shard: 0,
        realm: 0,
        num: 0,
    };

    /// Shorthand for an account in shard 0, realm 0.
    pub const fn new(num: u64) -> Self {
        Self {
            shard: 0,
            realm: 0,
            num,
        }
    }

    /// Whether this is the unset sentinel.
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// Identifier of a smart contract, `shard.realm.num`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct ContractId {
    /// Shard number.
    pub shard: u64,
    /// Realm number.
    pub realm: u64,
    /// Contract number within the realm.
    pub num: u64,
}

impl ContractId {
    /// Shorthand for a contract in shard 0, realm 0.
    pub const fn new(num: u64) -> Self {
        Self {
            shard: 0,
            realm: 0,
            num,
        }
    }

    /// The account id backing this contract.
    pub fn account_id(&self) -> AccountId {
        AccountId {
            shard: self.shard,
            realm: self.realm,
            num: self.num,
        }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// Identifier of a token type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct TokenId {
    /// Shard number.
    pub shard: u64,
    /// Realm number.
    pub realm: u64,
    /// Token number within the realm.
    pub num: u64,
}

impl TokenId {
    /// Shorthand for a token in shard 0, realm 0.
    pub const fn new(num: u64) -> Self {
        Self {
            shard: 0,
            realm: 0,
            num,
        }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// Identifier of a single NFT: a token type plus serial number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct NftId {
    /// The token type.
    pub token: TokenId,
    /// Serial number within the token type, starting at 1.
    pub serial: u64,
}

/// Identifier of a transaction: payer plus client-chosen start time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct TransactionId {
    /// The account to be charged for this transaction.
    pub payer: AccountId,
    /// Client-assigned validity start, nanoseconds since epoch.
    pub valid_start_nanos: i64,
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.payer, self.valid_start_nanos)
    }
}

/// A 20-byte EVM address.
///
/// Derived from an ECDSA secp256k1 public key (Keccak-256 of the
/// uncompressed point, last 20 bytes). Hollow accounts are identified only
/// by this alias until their key is learned from a signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct EvmAlias(pub [u8; 20]);

impl EvmAlias {
    /// Alias length in bytes.
    pub const BYTES: usize = 20;

    /// Interpret raw bytes as an alias, if they have the right length.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 20] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Get bytes as slice reference.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Debug for EvmAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for EvmAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
