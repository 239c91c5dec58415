//! Strong type definitions for GreenProof.
//!
//! All identifiers and digests are newtypes to prevent misuse at compile time.
//! They render as lowercase hex everywhere they leave the process: in JSON,
//! in storage, and in `Display`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Length of a record identifier in bytes (24 hex characters).
pub const RECORD_ID_LEN: usize = 12;

/// Length of a proof hash in bytes (64 hex characters).
pub const PROOF_HASH_LEN: usize = 32;

/// Length of a transaction id in bytes (32 hex characters).
pub const TX_ID_LEN: usize = 16;

macro_rules! hex_newtype {
    ($(#[$meta:meta])* $name:ident, $len:expr, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Create from raw bytes.
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Get the raw bytes.
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Convert to a lowercase hex string.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parse from a hex string of exactly the right length.
            pub fn from_hex(s: &str) -> Result<Self, CoreError> {
                let invalid = || CoreError::InvalidHex {
                    kind: $kind,
                    value: s.to_string(),
                };
                let bytes = hex::decode(s).map_err(|_| invalid())?;
                let arr: [u8; $len] = bytes.try_into().map_err(|_| invalid())?;
                Ok(Self(arr))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(de::Error::custom)
            }
        }
    };
}

hex_newtype!(
    /// Identifier of a stored impact action.
    ///
    /// Layout: 4-byte big-endian creation time in seconds, 5 random bytes
    /// fixed per store instance, 3-byte big-endian counter.
    ActionId,
    RECORD_ID_LEN,
    "action id"
);

hex_newtype!(
    /// Identifier of a stored proof record. Same layout as [`ActionId`].
    ProofId,
    RECORD_ID_LEN,
    "proof id"
);

hex_newtype!(
    /// SHA-256 digest of an action's canonical content plus salt.
    ProofHash,
    PROOF_HASH_LEN,
    "proof hash"
);

hex_newtype!(
    /// Simulated transaction id derived from a [`ProofHash`].
    TxId,
    TX_ID_LEN,
    "tx id"
);

/// Assemble the raw bytes of a record identifier.
///
/// Only the low 24 bits of `counter` are used.
pub fn record_id_bytes(timestamp_secs: u32, random: [u8; 5], counter: u32) -> [u8; RECORD_ID_LEN] {
    let mut bytes = [0u8; RECORD_ID_LEN];
    bytes[..4].copy_from_slice(&timestamp_secs.to_be_bytes());
    bytes[4..9].copy_from_slice(&random);
    bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
    bytes
}

impl ActionId {
    /// Creation time embedded in the identifier (Unix seconds).
    pub fn timestamp_secs(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl ProofHash {
    /// Compute the SHA-256 digest of `data`.
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }
}
