//! Escrow balances: pull-based payouts.
//!
//! Distributions credit a per-(asset, payee) balance; payees withdraw later.
//! Entries are created lazily and removed again when they return to zero.

use std::collections::HashMap;

use splitpay_types::{Address, Amount, Asset};

use crate::error::LedgerError;
use crate::request::ValidatedRequest;
use crate::settlement::{Payout, Routing, Settlement};

/// Owed amounts keyed by asset and payee.
#[derive(Clone, Debug, Default)]
pub struct EscrowBook {
    balances: HashMap<(Asset, Address), Amount>,
}

impl EscrowBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, asset: &Asset, payee: &Address) -> Amount {
        self.balances.get(&(*asset, *payee)).copied().unwrap_or(0)
    }

    /// Overwrite one entry. Zero removes it.
    pub fn set(&mut self, asset: Asset, payee: Address, amount: Amount) {
        if amount == 0 {
            self.balances.remove(&(asset, payee));
        } else {
            self.balances.insert((asset, payee), amount);
        }
    }

    /// Add to one entry, returning the previous balance.
    pub fn credit(
        &mut self,
        asset: Asset,
        payee: Address,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        let previous = self.balance_of(&asset, &payee);
        let next = previous.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.set(asset, payee, next);
        Ok(previous)
    }

    /// Zero one entry, returning what it held.
    pub fn take(&mut self, asset: &Asset, payee: &Address) -> Amount {
        self.balances.remove(&(*asset, *payee)).unwrap_or(0)
    }

    /// Check that crediting every payout would not overflow any entry.
    ///
    /// Payees that appear more than once are summed first.
    pub fn check_credits(&self, asset: &Asset, payouts: &[Payout]) -> Result<(), LedgerError> {
        let mut pending: HashMap<Address, Amount> = HashMap::new();
        for payout in payouts {
            let entry = pending
                .entry(payout.payee)
                .or_insert_with(|| self.balance_of(asset, &payout.payee));
            *entry = entry.checked_add(payout.amount).ok_or(LedgerError::Overflow)?;
        }
        Ok(())
    }

    /// Sum of all balances owed in one asset.
    pub fn total_owed(&self, asset: &Asset) -> Amount {
        self.balances
            .iter()
            .filter(|((a, _), _)| a == asset)
            .fold(0u128, |acc, (_, amount)| acc.saturating_add(*amount))
    }

    /// All non-zero entries.
    pub fn entries(&self) -> impl Iterator<Item = (&Asset, &Address, Amount)> + '_ {
        self.balances
            .iter()
            .map(|((asset, payee), amount)| (asset, payee, *amount))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// Plan a fee-free escrow distribution.
pub fn plan(validated: &ValidatedRequest<'_>, book: &EscrowBook) -> Result<Settlement, LedgerError> {
    let settlement = Settlement::build(validated, Routing::Escrow, 0)?;
    book.check_credits(&settlement.asset, &settlement.payouts)?;
    Ok(settlement)
}
