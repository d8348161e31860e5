//! Fundamental types for the splitpay distribution ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, assets, amount arithmetic, ledger parameters, and the variant set.

pub mod address;
pub mod amount;
pub mod asset;
pub mod error;
pub mod params;

pub use address::Address;
pub use amount::{apply_bps, checked_sum, Amount, BPS_DIVISOR, MAX_FEE_BPS, MAX_PAYEES};
pub use asset::Asset;
pub use error::SplitpayError;
pub use params::{LedgerParams, Variant};
