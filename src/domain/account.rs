use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// A 20-byte account or component address.
///
/// Rendered as lowercase `0x`-prefixed hex, which is also the form used in
/// access-control error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 20]);

/// Errors raised when parsing an [`Address`] or [`Role`] from hex.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HexParseError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(decode_fixed(s)?))
    }
}

/// A 32-byte role identifier, as used by the per-component role tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Role([u8; 32]);

impl Role {
    /// Administers every other role. All zeroes.
    pub const DEFAULT_ADMIN: Role = Role([0u8; 32]);

    /// Role identifier derived from its name: `keccak256(name)`.
    pub fn named(name: &str) -> Self {
        let digest = Keccak256::digest(name.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Required for every mutating operation on the registry and the ledger.
    pub fn manager() -> Self {
        Self::named("MANAGER")
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Role {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(decode_fixed(s)?))
    }
}

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], HexParseError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let raw = hex::decode(digits).map_err(|e| HexParseError::InvalidHex(e.to_string()))?;
    let actual = raw.len();
    raw.try_into().map_err(|_| HexParseError::InvalidLength {
        expected: N,
        actual,
    })
}

macro_rules! hex_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

hex_serde!(Address);
hex_serde!(Role);
