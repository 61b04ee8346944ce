//! Identifier types: event ids, account addresses, and transaction hashes.
//!
//! Event ids are small integers assigned in creation order. Addresses are
//! 20-byte account identifiers that travel as `0x`-prefixed hex strings on
//! the wire, so they serialize through their string form rather than as a
//! byte array.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Identifier of an event in the catalog.
///
/// Assigned as `count + 1` at creation time, so ids are unique and strictly
/// increasing within one process lifetime. They are not unique across
/// processes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct EventId(#[ts(type = "number")] pub u64);

impl EventId {
    /// Return the inner integer value.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Errors produced when parsing an [`Address`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    /// The string did not start with `0x`.
    #[error("address must start with 0x")]
    MissingPrefix,

    /// The hex body had the wrong number of characters.
    #[error("address must be {expected} hex characters, got {actual}")]
    InvalidLength {
        /// Required number of hex characters.
        expected: usize,
        /// Number of hex characters found.
        actual: usize,
    },

    /// The body contained a non-hex character.
    #[error("address contains invalid hex: {0}")]
    InvalidHex(String),
}

/// A 20-byte account address.
///
/// Parsed case-insensitively from `0x` + 40 hex characters and always
/// displayed in lowercase.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0; ADDRESS_LEN]);

    /// Wrap raw address bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw address bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Shortened form used in headers and logs, e.g. `0xa6dc...91b1`.
    pub fn short(&self) -> String {
        let full = self.to_string();
        let head = full.get(..6).unwrap_or_default();
        let tail = full.get(full.len().saturating_sub(4)..).unwrap_or_default();
        format!("{head}...{tail}")
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressParseError::MissingPrefix)?;

        let expected = ADDRESS_LEN.saturating_mul(2);
        if body.len() != expected {
            return Err(AddressParseError::InvalidLength {
                expected,
                actual: body.len(),
            });
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Opaque identifier returned by the wallet provider for a submitted
/// transaction or call bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const KEY: &str = "0xa6DC2754602E7e3b70E80d62CD765d71538091b1";

    #[test]
    fn address_parses_mixed_case_and_displays_lowercase() {
        let addr: Address = KEY.parse().unwrap();
        assert_eq!(addr.to_string(), KEY.to_lowercase());
        assert!(!addr.is_zero());
    }

    #[test]
    fn address_rejects_missing_prefix() {
        let result = "a6DC2754602E7e3b70E80d62CD765d71538091b1".parse::<Address>();
        assert_eq!(result, Err(AddressParseError::MissingPrefix));
    }

    #[test]
    fn address_rejects_short_body() {
        let result = "0xABC".parse::<Address>();
        assert_eq!(
            result,
            Err(AddressParseError::InvalidLength {
                expected: 40,
                actual: 3
            })
        );
    }

    #[test]
    fn address_rejects_non_hex() {
        let result = "0xzz00000000000000000000000000000000000000".parse::<Address>();
        assert!(matches!(result, Err(AddressParseError::InvalidHex(_))));
    }

    #[test]
    fn address_short_form() {
        let addr: Address = KEY.parse().unwrap();
        assert_eq!(addr.short(), "0xa6dc...91b1");
    }

    #[test]
    fn address_serde_uses_string_form() {
        let addr: Address = KEY.parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", KEY.to_lowercase()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn event_id_serializes_as_number() {
        let json = serde_json::to_string(&EventId(7)).unwrap();
        assert_eq!(json, "7");
    }
}
