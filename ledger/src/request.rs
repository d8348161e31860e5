//! Distribution requests and the shared validation pass.

use serde::{Deserialize, Serialize};
use splitpay_types::{checked_sum, Address, Amount, Asset};

use crate::error::LedgerError;

/// One call's worth of distribution input.
///
/// `payees` and `amounts` are parallel lists; payees may repeat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRequest {
    pub caller: Address,
    pub asset: Asset,
    pub payees: Vec<Address>,
    pub amounts: Vec<Amount>,
    /// Native value attached to the call. Must be zero for token assets.
    #[serde(default)]
    pub attached_value: Amount,
}

impl DistributionRequest {
    /// A native-asset request.
    pub fn native(
        caller: Address,
        payees: Vec<Address>,
        amounts: Vec<Amount>,
        attached_value: Amount,
    ) -> Self {
        Self {
            caller,
            asset: Asset::Native,
            payees,
            amounts,
            attached_value,
        }
    }

    /// A token-asset request. Attaches no native value.
    pub fn token(
        caller: Address,
        token: Address,
        payees: Vec<Address>,
        amounts: Vec<Amount>,
    ) -> Self {
        Self {
            caller,
            asset: Asset::Token(token),
            payees,
            amounts,
            attached_value: 0,
        }
    }

    /// Pairs of `(payee, amount)` in input order.
    pub fn entries(&self) -> impl Iterator<Item = (&Address, Amount)> + '_ {
        self.payees.iter().zip(self.amounts.iter().copied())
    }

    /// Check list shape and compute the total.
    pub fn validate(&self, max_payees: usize) -> Result<ValidatedRequest<'_>, LedgerError> {
        if self.payees.len() != self.amounts.len() {
            return Err(LedgerError::InvalidRequest(format!(
                "{} payees but {} amounts",
                self.payees.len(),
                self.amounts.len()
            )));
        }
        if self.payees.is_empty() {
            return Err(LedgerError::InvalidRequest("no payees".into()));
        }
        if self.payees.len() > max_payees {
            return Err(LedgerError::InvalidRequest(format!(
                "{} payees exceeds the limit of {max_payees}",
                self.payees.len()
            )));
        }
        let total = checked_sum(&self.amounts).ok_or(LedgerError::Overflow)?;
        Ok(ValidatedRequest {
            request: self,
            total,
        })
    }
}

/// A request whose shape has been checked and whose total is known.
#[derive(Clone, Copy, Debug)]
pub struct ValidatedRequest<'a> {
    pub request: &'a DistributionRequest,
    pub total: Amount,
}
