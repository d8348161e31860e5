//! Errors for the shared types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitpayError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid ledger parameters: {0}")]
    InvalidParams(String),
}
