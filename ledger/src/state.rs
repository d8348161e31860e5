//! Mutable ledger state and its journaled write paths.

use splitpay_types::{Address, Amount, Asset};

use crate::error::LedgerError;
use crate::escrow::EscrowBook;
use crate::event::{EventLog, LedgerEvent};
use crate::fees::FeeBook;
use crate::journal::{Journal, Undo};
use crate::settlement::{Routing, Settlement};

/// Everything the ledger mutates: escrow balances, the fee layer, the log.
#[derive(Clone, Debug)]
pub struct LedgerState {
    pub escrow: EscrowBook,
    pub fees: FeeBook,
    pub events: EventLog,
}

impl LedgerState {
    pub fn new(fees: FeeBook) -> Self {
        Self {
            escrow: EscrowBook::new(),
            fees,
            events: EventLog::new(),
        }
    }

    /// Open a journal for one operation.
    pub fn begin(&self) -> Journal {
        Journal::new(self.events.mark())
    }

    pub fn credit_balance(
        &mut self,
        journal: &mut Journal,
        asset: Asset,
        payee: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let previous = self.escrow.credit(asset, payee, amount)?;
        journal.record(Undo::Balance {
            asset,
            payee,
            previous,
        });
        Ok(())
    }

    /// Zero a balance entry, returning what it held.
    pub fn take_balance(&mut self, journal: &mut Journal, asset: Asset, payee: Address) -> Amount {
        let previous = self.escrow.take(&asset, &payee);
        journal.record(Undo::Balance {
            asset,
            payee,
            previous,
        });
        previous
    }

    pub fn accrue_fee(
        &mut self,
        journal: &mut Journal,
        asset: Asset,
        fee: Amount,
    ) -> Result<(), LedgerError> {
        let previous = self.fees.accrue(asset, fee)?;
        journal.record(Undo::FeePool { asset, previous });
        Ok(())
    }

    /// Zero a fee pool, returning what it held.
    pub fn drain_fees(&mut self, journal: &mut Journal, asset: Asset) -> Amount {
        let previous = self.fees.drain(&asset);
        journal.record(Undo::FeePool { asset, previous });
        previous
    }

    /// Apply the internal effects of a settlement: escrow credits, fee
    /// accrual, and one `Payment` event per payout in input order.
    ///
    /// On failure nothing is left applied.
    pub fn apply(&mut self, settlement: &Settlement) -> Result<Journal, LedgerError> {
        let mut journal = self.begin();
        if let Err(err) = self.apply_into(&mut journal, settlement) {
            self.rollback(journal);
            return Err(err);
        }
        Ok(journal)
    }

    fn apply_into(&mut self, journal: &mut Journal, settlement: &Settlement) -> Result<(), LedgerError> {
        if settlement.routing == Routing::Escrow {
            for payout in &settlement.payouts {
                self.credit_balance(journal, settlement.asset, payout.payee, payout.amount)?;
            }
        }
        if settlement.fee > 0 {
            self.accrue_fee(journal, settlement.asset, settlement.fee)?;
        }
        for payout in &settlement.payouts {
            self.events.emit(LedgerEvent::Payment {
                asset: settlement.asset,
                payee: payout.payee,
                amount: payout.amount,
            });
        }
        Ok(())
    }

    /// Restore every value the journal replaced and drop its events.
    pub fn rollback(&mut self, journal: Journal) {
        let mark = journal.event_mark();
        for undo in journal.into_undo() {
            match undo {
                Undo::Balance {
                    asset,
                    payee,
                    previous,
                } => self.escrow.set(asset, payee, previous),
                Undo::FeePool { asset, previous } => self.fees.set_pool(asset, previous),
            }
        }
        self.events.truncate(mark);
    }
}
