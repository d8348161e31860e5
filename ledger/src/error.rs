use splitpay_store::StoreError;
use splitpay_types::{Address, Amount, SplitpayError, Variant};
use thiserror::Error;

use crate::host::HostError;

/// Every failure aborts the whole operation; the ledger is left exactly as it
/// was before the call.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("value mismatch: attached {attached}, required {required}")]
    ValueMismatch { attached: Amount, required: Amount },

    #[error("insufficient balance for {holder}: available {available}, required {required}")]
    InsufficientBalance {
        holder: Address,
        available: Amount,
        required: Amount,
    },

    #[error("invalid fee rate: {0} bps")]
    InvalidFee(u16),

    #[error("caller {0} is not the owner")]
    Unauthorized(Address),

    #[error("reentrant call rejected")]
    Reentrant,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("{operation} is not offered by the {variant} variant")]
    Unsupported {
        operation: &'static str,
        variant: Variant,
    },

    #[error("external transfer failed: {0}")]
    Transfer(#[from] HostError),

    #[error("invalid payment group: {0}")]
    InvalidGroup(String),

    #[error("invalid parameters: {0}")]
    Params(#[from] SplitpayError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
