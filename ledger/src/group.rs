//! Reusable named payment groups.
//!
//! A group fixes a list of payees and amounts on one chain, paid either in the
//! chain's native currency or in one token. Groups are validated before they
//! are turned into a [`DistributionRequest`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use splitpay_types::{checked_sum, Address, Amount, Asset};

use crate::error::LedgerError;
use crate::request::DistributionRequest;

/// A fungible token deployed on a specific chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
    pub name: String,
    pub symbol: String,
    pub address: Address,
    pub chain_id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPayee {
    #[serde(default)]
    pub name: String,
    pub wallet: Address,
    /// Whole units, widened to [`Amount`] when a request is built.
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentGroup {
    pub name: String,
    #[serde(default)]
    pub detail: Option<String>,
    pub chain_id: u64,
    /// `None` pays in the chain's native currency.
    #[serde(default)]
    pub token: Option<TokenRef>,
    #[serde(default, rename = "payee")]
    pub payees: Vec<GroupPayee>,
}

impl PaymentGroup {
    pub fn uses_native_currency(&self) -> bool {
        self.token.is_none()
    }

    pub fn asset(&self) -> Asset {
        match &self.token {
            Some(token) => Asset::Token(token.address),
            None => Asset::Native,
        }
    }

    /// Check chain consistency, wallet uniqueness, positive amounts, and size.
    pub fn validate(&self, max_payees: usize) -> Result<(), LedgerError> {
        if let Some(token) = &self.token {
            if token.chain_id != self.chain_id {
                return Err(LedgerError::InvalidGroup(format!(
                    "token {} is on chain {}, group {} is on chain {}",
                    token.symbol, token.chain_id, self.name, self.chain_id
                )));
            }
        }
        if self.payees.is_empty() || self.payees.len() > max_payees {
            return Err(LedgerError::InvalidGroup(format!(
                "group {} has {} payees, expected 1..={max_payees}",
                self.name,
                self.payees.len()
            )));
        }
        let mut seen = HashSet::new();
        for payee in &self.payees {
            if !seen.insert(payee.wallet) {
                return Err(LedgerError::InvalidGroup(format!(
                    "wallet {} appears more than once in group {}",
                    payee.wallet, self.name
                )));
            }
            if payee.amount == 0 {
                return Err(LedgerError::InvalidGroup(format!(
                    "wallet {} has a zero amount",
                    payee.wallet
                )));
            }
        }
        Ok(())
    }

    pub fn total(&self) -> Result<Amount, LedgerError> {
        let amounts: Vec<Amount> = self.payees.iter().map(|p| Amount::from(p.amount)).collect();
        checked_sum(&amounts).ok_or(LedgerError::Overflow)
    }

    /// Build the distribution request for one payment of this group.
    pub fn to_request(&self, caller: Address, attached_value: Amount) -> DistributionRequest {
        DistributionRequest {
            caller,
            asset: self.asset(),
            payees: self.payees.iter().map(|p| p.wallet).collect(),
            amounts: self.payees.iter().map(|p| Amount::from(p.amount)).collect(),
            attached_value,
        }
    }
}
