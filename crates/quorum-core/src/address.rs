//! Account addresses
//!
//! Owners are 20-byte account identifiers rendered in the mixed-case
//! checksummed hex form (EIP-55).

use std::fmt;
use std::str::FromStr;

use keccak_hash::keccak;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{QuorumError, QuorumResult};

/// Address length in bytes
pub const ADDRESS_LEN: usize = 20;

/// Account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

/// Head and tail marker of the contract's owner linked list
pub const SENTINEL_OWNERS: Address = Address::from_low_u64(1);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    #[inline]
    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    /// Build an address whose trailing 8 bytes hold `value` (big-endian)
    pub const fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        let be = value.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[ADDRESS_LEN - 8 + i] = be[i];
            i += 1;
        }
        Address(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// True for the zero address and the list sentinel
    pub fn is_reserved(&self) -> bool {
        *self == Address::ZERO || *self == SENTINEL_OWNERS
    }

    /// Parse a `0x`-prefixed hex address.
    ///
    /// Single-case input is accepted as-is. Mixed-case input must carry a
    /// valid checksum.
    pub fn parse(input: &str) -> QuorumResult<Self> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| QuorumError::InvalidAddress(input.to_string()))?;

        if digits.len() != ADDRESS_LEN * 2 {
            return Err(QuorumError::InvalidAddress(input.to_string()));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| QuorumError::InvalidAddress(input.to_string()))?;
        let address = Address(bytes);

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *digits {
            return Err(QuorumError::AddressChecksumMismatch(input.to_string()));
        }

        Ok(address)
    }

    /// Render in EIP-55 checksummed form
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak(lower.as_bytes());
        let hash = hash.as_bytes();

        let mut out = String::with_capacity(2 + ADDRESS_LEN * 2);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = QuorumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == SENTINEL_OWNERS {
            write!(f, "Address(SENTINEL)")
        } else {
            write!(f, "Address({})", self.to_checksum())
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}
