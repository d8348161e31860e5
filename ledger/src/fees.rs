//! Fee accrual: rate, premium exemptions, and per-asset fee pools.

use std::collections::{HashMap, HashSet};

use splitpay_types::{apply_bps, Address, Amount, Asset, MAX_FEE_BPS};

use crate::error::LedgerError;
use crate::request::ValidatedRequest;
use crate::settlement::{Routing, Settlement};

/// The fee layer's state.
///
/// The rate never exceeds [`MAX_FEE_BPS`]. Every mutation re-checks the bound.
#[derive(Clone, Debug)]
pub struct FeeBook {
    rate_bps: u16,
    premium: HashSet<Address>,
    pools: HashMap<Asset, Amount>,
}

impl FeeBook {
    pub fn new(initial_rate_bps: u16) -> Result<Self, LedgerError> {
        let mut book = Self {
            rate_bps: 0,
            premium: HashSet::new(),
            pools: HashMap::new(),
        };
        book.set_rate(initial_rate_bps)?;
        Ok(book)
    }

    pub fn rate(&self) -> u16 {
        self.rate_bps
    }

    /// Store a new rate. The prior rate is kept on failure.
    pub fn set_rate(&mut self, rate_bps: u16) -> Result<(), LedgerError> {
        if rate_bps > MAX_FEE_BPS {
            return Err(LedgerError::InvalidFee(rate_bps));
        }
        self.rate_bps = rate_bps;
        Ok(())
    }

    pub fn set_premium(&mut self, addr: Address, flag: bool) {
        if flag {
            self.premium.insert(addr);
        } else {
            self.premium.remove(&addr);
        }
    }

    pub fn is_premium(&self, addr: &Address) -> bool {
        self.premium.contains(addr)
    }

    pub fn premium_users(&self) -> impl Iterator<Item = &Address> + '_ {
        self.premium.iter()
    }

    /// `0` for premium callers, otherwise `floor(total * rate / 10_000)`.
    pub fn calculate_fee(&self, caller: &Address, total: Amount) -> Amount {
        if self.is_premium(caller) {
            return 0;
        }
        apply_bps(total, self.rate_bps)
    }

    pub fn pool(&self, asset: &Asset) -> Amount {
        self.pools.get(asset).copied().unwrap_or(0)
    }

    /// Overwrite one pool. Zero removes it.
    pub fn set_pool(&mut self, asset: Asset, amount: Amount) {
        if amount == 0 {
            self.pools.remove(&asset);
        } else {
            self.pools.insert(asset, amount);
        }
    }

    /// Add a fee to a pool, returning the previous pool value.
    pub fn accrue(&mut self, asset: Asset, fee: Amount) -> Result<Amount, LedgerError> {
        let previous = self.pool(&asset);
        let next = previous.checked_add(fee).ok_or(LedgerError::Overflow)?;
        self.set_pool(asset, next);
        Ok(previous)
    }

    pub fn check_accrual(&self, asset: &Asset, fee: Amount) -> Result<(), LedgerError> {
        self.pool(asset)
            .checked_add(fee)
            .map(|_| ())
            .ok_or(LedgerError::Overflow)
    }

    /// Zero one pool, returning what it held.
    pub fn drain(&mut self, asset: &Asset) -> Amount {
        self.pools.remove(asset).unwrap_or(0)
    }

    pub fn pools(&self) -> impl Iterator<Item = (&Asset, Amount)> + '_ {
        self.pools.iter().map(|(asset, amount)| (asset, *amount))
    }
}

/// Plan a fee-bearing direct distribution.
///
/// The fee is paid on top of the distributed total.
pub fn plan(validated: &ValidatedRequest<'_>, book: &FeeBook) -> Result<Settlement, LedgerError> {
    let request = validated.request;
    let fee = book.calculate_fee(&request.caller, validated.total);
    book.check_accrual(&request.asset, fee)?;
    Settlement::build(validated, Routing::Direct, fee)
}
