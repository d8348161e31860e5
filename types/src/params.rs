//! Ledger parameters and the closed set of distribution variants.
//!
//! Parameters are fixed at construction. The fee rate itself is runtime state
//! (owner-mutable), so only its initial value lives here. The payee limit
//! ([`MAX_PAYEES`](crate::MAX_PAYEES)) and the fee cap ([`MAX_FEE_BPS`]) are fixed and not
//! configurable.

use crate::amount::MAX_FEE_BPS;
use crate::error::SplitpayError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which distribution behaviour a ledger offers.
///
/// Selected once at construction; every entry point dispatches on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Direct one-shot distribution, no escrow, no fee.
    Plain,
    /// Direct distribution plus pull-based escrow balances.
    Escrow,
    /// Fee-bearing direct distribution.
    Fee,
    /// Fee-bearing direct distribution plus fee-bearing escrow.
    EscrowFee,
}

impl Variant {
    pub fn version(&self) -> &'static str {
        match self {
            Variant::Plain => "1.0.0",
            Variant::Escrow => "1.1.0-escrow",
            Variant::Fee => "1.2.0-fee",
            Variant::EscrowFee => "1.3.0-escrow-fee",
        }
    }

    pub fn has_escrow(&self) -> bool {
        matches!(self, Variant::Escrow | Variant::EscrowFee)
    }

    pub fn has_fees(&self) -> bool {
        matches!(self, Variant::Fee | Variant::EscrowFee)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Plain => "plain",
            Variant::Escrow => "escrow",
            Variant::Fee => "fee",
            Variant::EscrowFee => "escrow-fee",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Construction-time ledger parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Which entry points the ledger offers.
    #[serde(default = "default_variant")]
    pub variant: Variant,

    /// Fee rate at construction, in basis points. At most [`MAX_FEE_BPS`].
    #[serde(default)]
    pub initial_fee_bps: u16,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_variant() -> Variant {
    Variant::EscrowFee
}

impl LedgerParams {
    /// Defaults for a given variant.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Check that the initial rate respects the fee cap.
    pub fn validate(&self) -> Result<(), SplitpayError> {
        if self.initial_fee_bps > MAX_FEE_BPS {
            return Err(SplitpayError::InvalidParams(format!(
                "initial_fee_bps must not exceed {MAX_FEE_BPS}, got {}",
                self.initial_fee_bps
            )));
        }
        Ok(())
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            initial_fee_bps: 0,
        }
    }
}
