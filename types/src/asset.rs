//! Asset identifiers: the native value unit or a fungible-token contract.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The key under which balances and fee pools are tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    /// The host's native value unit, attached directly to a call.
    Native,
    /// A fungible token identified by its contract address.
    Token(Address),
}

impl Asset {
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// The token contract, if this is a token asset.
    pub fn token_address(&self) -> Option<&Address> {
        match self {
            Asset::Native => None,
            Asset::Token(addr) => Some(addr),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Token(addr) => write!(f, "token:{addr}"),
        }
    }
}
