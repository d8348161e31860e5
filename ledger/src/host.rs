//! The external value-transfer capability.
//!
//! The ledger never moves value itself. It asks an [`AssetHost`] to debit
//! callers and credit recipients, and keeps its own books consistent around
//! those calls. The host is responsible for reverting its own transfers when
//! an operation fails after some of them went through.

use splitpay_types::{Address, Amount, Asset};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("{holder} holds {available} of {asset}, needs {needed}")]
    InsufficientFunds {
        asset: Asset,
        holder: Address,
        available: Amount,
        needed: Amount,
    },

    #[error("transfer to {recipient} rejected: {reason}")]
    Rejected { recipient: Address, reason: String },
}

/// Moves value on behalf of the ledger.
///
/// Native value attached to a call is already in ledger custody when an
/// operation starts, so there is no native `pull`.
pub trait AssetHost {
    /// Spendable balance of `holder` in a token asset.
    fn available(&self, asset: &Asset, holder: &Address) -> Amount;

    /// Move `amount` of a token from `from` into ledger custody.
    fn pull(&self, asset: &Asset, from: &Address, amount: Amount) -> Result<(), HostError>;

    /// Move `amount` of a token from `from` straight to `to`.
    fn transfer_from(
        &self,
        asset: &Asset,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), HostError>;

    /// Pay `amount` out of ledger custody to `to`.
    ///
    /// Recipient code may run during this call and may call back into the
    /// ledger.
    fn push(&self, asset: &Asset, to: &Address, amount: Amount) -> Result<(), HostError>;
}
