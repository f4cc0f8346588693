//! Fixed-size hash types.
//!
//! NEO displays 256-bit hashes (transaction ids, asset ids) and contract
//! script hashes big-endian, but serializes them little-endian. Each type
//! here stores one canonical order and converts explicitly.

use crate::codec::{from_hex_array, reversed, to_hex};
use crate::constants::{HASH_SIZE, SCRIPT_HASH_SIZE};
use crate::error::FormatError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ─── UInt256 ────────────────────────────────────────────────────────────────

/// 256-bit hash stored in display (big-endian) order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UInt256([u8; HASH_SIZE]);

impl UInt256 {
    pub const fn from_display_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build from bytes as they appear on the wire.
    pub fn from_wire(bytes: [u8; HASH_SIZE]) -> Self {
        let mut out = bytes;
        out.reverse();
        Self(out)
    }

    /// Parse display hex (with or without `0x`).
    pub fn from_hex(s: &str) -> Result<Self, FormatError> {
        Ok(Self(from_hex_array(s)?))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Reversed bytes for serialization.
    pub fn to_wire(&self) -> [u8; HASH_SIZE] {
        let mut out = self.0;
        out.reverse();
        out
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl fmt::Display for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt256({})", self.to_hex())
    }
}

impl FromStr for UInt256 {
    type Err = FormatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for UInt256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for UInt256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ─── ScriptHash ─────────────────────────────────────────────────────────────

/// 160-bit script hash stored in wire order.
///
/// Wire order is also the order embedded in an address payload. Contract
/// hashes quoted as `0x...` in explorers are the reverse; use
/// [`ScriptHash::from_display_hex`] for those.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptHash([u8; SCRIPT_HASH_SIZE]);

impl ScriptHash {
    pub const fn from_bytes(bytes: [u8; SCRIPT_HASH_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, FormatError> {
        let arr: [u8; SCRIPT_HASH_SIZE] =
            bytes.try_into().map_err(|_| FormatError::InvalidLength {
                expected: SCRIPT_HASH_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Parse hex already in wire order.
    pub fn from_wire_hex(s: &str) -> Result<Self, FormatError> {
        Ok(Self(from_hex_array(s)?))
    }

    /// Parse big-endian display hex (`0x...` contract hashes).
    pub fn from_display_hex(s: &str) -> Result<Self, FormatError> {
        let mut bytes: [u8; SCRIPT_HASH_SIZE] = from_hex_array(s)?;
        bytes.reverse();
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SCRIPT_HASH_SIZE] {
        &self.0
    }

    pub fn to_wire_hex(&self) -> String {
        to_hex(&self.0)
    }

    pub fn to_display_hex(&self) -> String {
        to_hex(&reversed(&self.0))
    }
}

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_display_hex())
    }
}

impl fmt::Debug for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptHash(0x{})", self.to_display_hex())
    }
}

impl Serialize for ScriptHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScriptHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_display_hex(&s).map_err(serde::de::Error::custom)
    }
}
