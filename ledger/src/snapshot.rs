//! Persisted ledger state.
//!
//! A snapshot holds exactly the durable layout: owner, parameters, fee rate,
//! escrow balances, fee pools, and the premium registry. The event log is not
//! persisted. Entries are sorted so equal ledgers produce equal bytes.

use serde::{Deserialize, Serialize};
use splitpay_store::LedgerStore;
use splitpay_types::{Address, Amount, Asset, LedgerParams};

use crate::error::LedgerError;
use crate::fees::FeeBook;
use crate::ledger::Ledger;
use crate::state::LedgerState;

const SNAPSHOT_KEY: &[u8] = b"ledger_snapshot";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub asset: Asset,
    pub payee: Address,
    pub amount: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePoolEntry {
    pub asset: Asset,
    pub amount: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub owner: Address,
    pub params: LedgerParams,
    pub fee_bps: u16,
    pub balances: Vec<BalanceEntry>,
    pub fee_pools: Vec<FeePoolEntry>,
    pub premium_users: Vec<Address>,
}

impl Ledger {
    /// Capture the durable state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state();
        let mut balances: Vec<BalanceEntry> = state
            .escrow
            .entries()
            .map(|(asset, payee, amount)| BalanceEntry {
                asset: *asset,
                payee: *payee,
                amount,
            })
            .collect();
        balances.sort_by(|a, b| (a.asset, a.payee).cmp(&(b.asset, b.payee)));

        let mut fee_pools: Vec<FeePoolEntry> = state
            .fees
            .pools()
            .map(|(asset, amount)| FeePoolEntry {
                asset: *asset,
                amount,
            })
            .collect();
        fee_pools.sort_by(|a, b| a.asset.cmp(&b.asset));

        let mut premium_users: Vec<Address> = state.fees.premium_users().copied().collect();
        premium_users.sort();

        LedgerSnapshot {
            owner: self.owner,
            params: self.params.clone(),
            fee_bps: state.fees.rate(),
            balances,
            fee_pools,
            premium_users,
        }
    }

    /// Rebuild a ledger from a snapshot, re-checking every bound.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, LedgerError> {
        snapshot.params.validate()?;
        if !snapshot.params.variant.has_fees()
            && (snapshot.fee_bps != 0 || !snapshot.fee_pools.is_empty())
        {
            return Err(LedgerError::Snapshot(format!(
                "{} variant cannot carry fee state",
                snapshot.params.variant
            )));
        }
        if !snapshot.params.variant.has_escrow() && !snapshot.balances.is_empty() {
            return Err(LedgerError::Snapshot(format!(
                "{} variant cannot carry escrow balances",
                snapshot.params.variant
            )));
        }

        let mut fees = FeeBook::new(snapshot.fee_bps)?;
        for user in snapshot.premium_users {
            fees.set_premium(user, true);
        }
        for pool in snapshot.fee_pools {
            fees.accrue(pool.asset, pool.amount)?;
        }
        let mut state = LedgerState::new(fees);
        for entry in snapshot.balances {
            state.escrow.credit(entry.asset, entry.payee, entry.amount)?;
        }
        Ok(Ledger::from_parts(snapshot.owner, snapshot.params, state))
    }

    /// Persist the durable state to a store.
    pub fn save_to_store(&self, store: &dyn LedgerStore) -> Result<(), LedgerError> {
        let bytes = bincode::serialize(&self.snapshot())
            .map_err(|e| LedgerError::Snapshot(e.to_string()))?;
        store.put_meta(SNAPSHOT_KEY, &bytes)?;
        Ok(())
    }

    /// Restore a ledger from a store. `None` if nothing was saved.
    pub fn load_from_store(store: &dyn LedgerStore) -> Result<Option<Self>, LedgerError> {
        let Some(bytes) = store.get_meta(SNAPSHOT_KEY)? else {
            return Ok(None);
        };
        let snapshot: LedgerSnapshot =
            bincode::deserialize(&bytes).map_err(|e| LedgerError::Snapshot(e.to_string()))?;
        Self::from_snapshot(snapshot).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitpay_types::Variant;

    fn owner() -> Address {
        Address::repeat_byte(0x0f)
    }

    fn snapshot(variant: Variant) -> LedgerSnapshot {
        LedgerSnapshot {
            owner: owner(),
            params: LedgerParams::for_variant(variant),
            fee_bps: 0,
            balances: vec![],
            fee_pools: vec![],
            premium_users: vec![],
        }
    }

    #[test]
    fn restores_books() {
        let mut snap = snapshot(Variant::EscrowFee);
        snap.fee_bps = 40;
        snap.balances.push(BalanceEntry {
            asset: Asset::Native,
            payee: Address::repeat_byte(1),
            amount: 500,
        });
        snap.fee_pools.push(FeePoolEntry {
            asset: Asset::Native,
            amount: 9,
        });
        snap.premium_users.push(Address::repeat_byte(2));

        let ledger = Ledger::from_snapshot(snap.clone()).unwrap();
        assert_eq!(ledger.fee(), 40);
        assert_eq!(ledger.balance_of(&Asset::Native, &Address::repeat_byte(1)), 500);
        assert_eq!(ledger.accumulated_fees(&Asset::Native), 9);
        assert!(ledger.is_premium_user(&Address::repeat_byte(2)));
        assert_eq!(ledger.snapshot(), snap);
    }

    #[test]
    fn rejects_rate_above_cap() {
        let mut snap = snapshot(Variant::Fee);
        snap.fee_bps = 101;
        assert!(matches!(Ledger::from_snapshot(snap), Err(LedgerError::InvalidFee(101))));
    }

    #[test]
    fn rejects_state_the_variant_cannot_hold() {
        let mut snap = snapshot(Variant::Plain);
        snap.fee_bps = 5;
        assert!(matches!(Ledger::from_snapshot(snap), Err(LedgerError::Snapshot(_))));

        let mut snap = snapshot(Variant::Fee);
        snap.balances.push(BalanceEntry {
            asset: Asset::Native,
            payee: Address::repeat_byte(1),
            amount: 1,
        });
        assert!(matches!(Ledger::from_snapshot(snap), Err(LedgerError::Snapshot(_))));
    }
}
