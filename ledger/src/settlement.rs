//! Settlement plans: the output of the Validating and Computing phases.
//!
//! A [`Settlement`] describes every effect an operation will have before any
//! effect happens. Planning never mutates state, so a failed plan leaves the
//! ledger untouched.

use serde::{Deserialize, Serialize};
use splitpay_types::{Address, Amount, Asset};

use crate::error::LedgerError;
use crate::host::AssetHost;
use crate::request::ValidatedRequest;
use crate::state::LedgerState;
use crate::{combined, distribution, escrow, fees};

/// Where the distributed amounts go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Routing {
    /// Transferred to each payee during the call.
    Direct,
    /// Credited to each payee's escrow balance for later withdrawal.
    Escrow,
}

/// One payee's share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub payee: Address,
    pub amount: Amount,
}

/// The distribution flavours a ledger can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistributionKind {
    /// Direct transfer, no fee.
    Plain,
    /// Escrow credit, no fee.
    Escrow,
    /// Direct transfer plus fee accrual.
    Fee,
    /// Escrow credit plus fee accrual, one pass.
    EscrowFee,
}

impl DistributionKind {
    /// Run the Computing phase for this flavour against current state.
    pub fn plan(
        &self,
        validated: &ValidatedRequest<'_>,
        state: &LedgerState,
    ) -> Result<Settlement, LedgerError> {
        match self {
            DistributionKind::Plain => distribution::plan(validated),
            DistributionKind::Escrow => escrow::plan(validated, &state.escrow),
            DistributionKind::Fee => fees::plan(validated, &state.fees),
            DistributionKind::EscrowFee => combined::plan(validated, &state.escrow, &state.fees),
        }
    }
}

/// Every effect of one distribution, computed up front.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub asset: Asset,
    pub caller: Address,
    pub routing: Routing,
    /// Payee shares in input order.
    pub payouts: Vec<Payout>,
    /// Sum of the payee shares.
    pub total: Amount,
    /// Fee added to the asset's pool.
    pub fee: Amount,
    /// `total + fee`: the exact native value to attach, or the token balance
    /// the caller must hold.
    pub required: Amount,
    /// Token amount moved from the caller into ledger custody in one pull.
    pub custody_pull: Amount,
}

impl Settlement {
    pub(crate) fn build(
        validated: &ValidatedRequest<'_>,
        routing: Routing,
        fee: Amount,
    ) -> Result<Self, LedgerError> {
        let request = validated.request;
        let required = validated
            .total
            .checked_add(fee)
            .ok_or(LedgerError::Overflow)?;
        let custody_pull = match (request.asset, routing) {
            (Asset::Native, _) => 0,
            (Asset::Token(_), Routing::Direct) => fee,
            (Asset::Token(_), Routing::Escrow) => required,
        };
        let payouts = request
            .entries()
            .map(|(payee, amount)| Payout {
                payee: *payee,
                amount,
            })
            .collect();
        Ok(Self {
            asset: request.asset,
            caller: request.caller,
            routing,
            payouts,
            total: validated.total,
            fee,
            required,
            custody_pull,
        })
    }

    /// Check the caller has funded the settlement.
    ///
    /// Native: the attached value must equal `required` exactly. Token: no
    /// native value may be attached, and the caller must hold `required`.
    pub fn check_funding(
        &self,
        attached_value: Amount,
        host: &dyn AssetHost,
    ) -> Result<(), LedgerError> {
        match self.asset {
            Asset::Native => {
                if attached_value != self.required {
                    return Err(LedgerError::ValueMismatch {
                        attached: attached_value,
                        required: self.required,
                    });
                }
            }
            Asset::Token(_) => {
                if attached_value != 0 {
                    return Err(LedgerError::ValueMismatch {
                        attached: attached_value,
                        required: 0,
                    });
                }
                let available = host.available(&self.asset, &self.caller);
                if available < self.required {
                    return Err(LedgerError::InsufficientBalance {
                        holder: self.caller,
                        available,
                        required: self.required,
                    });
                }
            }
        }
        Ok(())
    }
}
