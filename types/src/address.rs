//! 20-byte account address with `0x` hex text form.

use crate::error::SplitpayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An account identity: callers, payees, the owner, and token contracts.
///
/// Rendered as `0x` followed by 40 lowercase hex characters. Parsing accepts
/// either case.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The standard prefix for the textual form.
    pub const PREFIX: &'static str = "0x";

    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build an address whose every byte is `byte`. Handy for fixtures.
    pub fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Parse the `0x`-prefixed hex form.
    pub fn parse(s: &str) -> Result<Self, SplitpayError> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| SplitpayError::InvalidAddress(s.to_string()))?;
        if digits.len() != 40 {
            return Err(SplitpayError::InvalidAddress(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| SplitpayError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = SplitpayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = SplitpayError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}
