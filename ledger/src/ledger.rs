//! The ledger service: every entry point, query, and the variant dispatch.
//!
//! Each mutating operation runs `Validating → Computing → Effecting`.
//! Validation and computation produce a [`Settlement`] without touching state;
//! Effecting pulls custody, applies journaled internal writes, emits events,
//! and only then calls out to recipients. A failed outbound transfer rolls the
//! journal back, so callers observe either the whole operation or none of it.
//!
//! State lives behind a `RefCell` because recipients may call back into the
//! ledger while a payout is in flight. No borrow is ever held across a host
//! call.

use std::cell::{Ref, RefCell};

use serde::{Deserialize, Serialize};
use splitpay_types::{Address, Amount, Asset, LedgerParams, Variant, MAX_PAYEES};

use crate::distribution;
use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::fees::FeeBook;
use crate::guard::{GuardScope, ReentrancyGuard};
use crate::host::AssetHost;
use crate::journal::Journal;
use crate::request::DistributionRequest;
use crate::settlement::{DistributionKind, Routing, Settlement};
use crate::state::LedgerState;

/// Outcome of a committed distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub settlement: Settlement,
    /// Events emitted by this operation, in payee-list order.
    pub events: Vec<LedgerEvent>,
}

/// What a distribution would cost, computed without side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub total: Amount,
    pub fee: Amount,
    /// Native value to attach (native asset) or token balance to hold.
    pub required: Amount,
}

/// A payment-distribution ledger of one fixed [`Variant`].
pub struct Ledger {
    pub(crate) owner: Address,
    pub(crate) params: LedgerParams,
    pub(crate) state: RefCell<LedgerState>,
    guard: ReentrancyGuard,
}

impl Ledger {
    /// Create an empty ledger owned by `owner`.
    ///
    /// Variants without a fee layer always start at a zero rate.
    pub fn new(owner: Address, params: LedgerParams) -> Result<Self, LedgerError> {
        params.validate()?;
        let initial_rate = if params.variant.has_fees() {
            params.initial_fee_bps
        } else {
            0
        };
        let fees = FeeBook::new(initial_rate)?;
        Ok(Self::from_parts(owner, params, LedgerState::new(fees)))
    }

    pub(crate) fn from_parts(owner: Address, params: LedgerParams, state: LedgerState) -> Self {
        Self {
            owner,
            params,
            state: RefCell::new(state),
            guard: ReentrancyGuard::new(),
        }
    }

    pub fn variant(&self) -> Variant {
        self.params.variant
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    // ── Distribution entry points ───────────────────────────────────────

    /// Direct distribution: fee-free for `Plain`/`Escrow`, fee-bearing for
    /// `Fee`/`EscrowFee`.
    pub fn pay(
        &self,
        request: &DistributionRequest,
        host: &dyn AssetHost,
    ) -> Result<Receipt, LedgerError> {
        let kind = if self.variant().has_fees() {
            DistributionKind::Fee
        } else {
            DistributionKind::Plain
        };
        self.distribute("pay", kind, request, host)
    }

    /// Escrow distribution: credits balances instead of transferring.
    /// Fee-bearing in the `EscrowFee` variant.
    pub fn distribute_to_escrow(
        &self,
        request: &DistributionRequest,
        host: &dyn AssetHost,
    ) -> Result<Receipt, LedgerError> {
        let kind = match self.variant() {
            Variant::Escrow => DistributionKind::Escrow,
            Variant::EscrowFee => DistributionKind::EscrowFee,
            _ => return Err(self.unsupported("distribute_to_escrow")),
        };
        self.distribute("distribute_to_escrow", kind, request, host)
    }

    fn distribute(
        &self,
        operation: &'static str,
        kind: DistributionKind,
        request: &DistributionRequest,
        host: &dyn AssetHost,
    ) -> Result<Receipt, LedgerError> {
        let _scope = self.enter(operation)?;

        // Validating + Computing
        let validated = request.validate(MAX_PAYEES)?;
        let settlement = kind.plan(&validated, &self.state.borrow())?;
        settlement.check_funding(request.attached_value, host)?;
        tracing::debug!(
            operation,
            caller = %settlement.caller,
            asset = %settlement.asset,
            payees = settlement.payouts.len(),
            total = settlement.total,
            fee = settlement.fee,
            "distribution validated"
        );

        // Effecting
        if settlement.custody_pull > 0 {
            host.pull(&settlement.asset, &settlement.caller, settlement.custody_pull)?;
        }
        let journal = self.state.borrow_mut().apply(&settlement)?;
        let mark = journal.event_mark();
        if settlement.routing == Routing::Direct {
            if let Err(err) = distribution::execute_payouts(&settlement, host) {
                tracing::warn!(operation, error = %err, "payout failed, rolling back");
                self.state.borrow_mut().rollback(journal);
                return Err(err);
            }
        }
        journal.commit();

        let events = self.state.borrow().events.since(mark).to_vec();
        tracing::info!(
            operation,
            asset = %settlement.asset,
            payees = settlement.payouts.len(),
            total = settlement.total,
            fee = settlement.fee,
            "distribution committed"
        );
        Ok(Receipt { settlement, events })
    }

    /// Pay out the caller's whole escrow balance in `asset`.
    ///
    /// An empty balance is a successful zero-amount withdrawal.
    pub fn withdraw(
        &self,
        caller: &Address,
        asset: Asset,
        host: &dyn AssetHost,
    ) -> Result<Amount, LedgerError> {
        if !self.variant().has_escrow() {
            return Err(self.unsupported("withdraw"));
        }
        let _scope = self.enter("withdraw")?;
        let amount = self.pay_out("withdraw", *caller, asset, host, |state, journal| {
            state.take_balance(journal, asset, *caller)
        })?;
        tracing::info!(payee = %caller, asset = %asset, amount, "escrow withdrawn");
        Ok(amount)
    }

    /// Owner only: pay out the whole fee pool for `asset` to the owner.
    pub fn withdraw_fees(
        &self,
        caller: &Address,
        asset: Asset,
        host: &dyn AssetHost,
    ) -> Result<Amount, LedgerError> {
        if !self.variant().has_fees() {
            return Err(self.unsupported("withdraw_fees"));
        }
        let _scope = self.enter("withdraw_fees")?;
        self.require_owner(caller, "withdraw_fees")?;
        let owner = self.owner;
        let amount = self.pay_out("withdraw_fees", owner, asset, host, |state, journal| {
            state.drain_fees(journal, asset)
        })?;
        tracing::info!(owner = %owner, asset = %asset, amount, "fees withdrawn");
        Ok(amount)
    }

    /// Zero an entry via `take`, emit the withdrawal, then transfer.
    fn pay_out(
        &self,
        operation: &'static str,
        recipient: Address,
        asset: Asset,
        host: &dyn AssetHost,
        take: impl FnOnce(&mut LedgerState, &mut Journal) -> Amount,
    ) -> Result<Amount, LedgerError> {
        let (journal, amount) = {
            let mut state = self.state.borrow_mut();
            let mut journal = state.begin();
            let amount = take(&mut *state, &mut journal);
            state.events.emit(LedgerEvent::Withdrawal {
                asset,
                payee: recipient,
                amount,
            });
            (journal, amount)
        };
        if amount > 0 {
            if let Err(err) = host.push(&asset, &recipient, amount) {
                tracing::warn!(operation, error = %err, "withdrawal transfer failed, rolling back");
                self.state.borrow_mut().rollback(journal);
                return Err(err.into());
            }
        }
        journal.commit();
        Ok(amount)
    }

    // ── Owner administration ────────────────────────────────────────────

    /// Owner only: set the fee rate in basis points. Rates above the cap fail
    /// with [`LedgerError::InvalidFee`] and leave the prior rate in place.
    ///
    /// Fails with [`LedgerError::Reentrant`] while a transferring operation is
    /// in flight.
    pub fn set_fee(&self, caller: &Address, rate_bps: u16) -> Result<(), LedgerError> {
        if !self.variant().has_fees() {
            return Err(self.unsupported("set_fee"));
        }
        let _scope = self.enter("set_fee")?;
        self.require_owner(caller, "set_fee")?;
        self.state.borrow_mut().fees.set_rate(rate_bps)?;
        tracing::info!(rate_bps, "fee rate updated");
        Ok(())
    }

    /// Owner only: flag or unflag a fee-exempt caller. Guarded like
    /// [`Ledger::set_fee`].
    pub fn set_premium_user(
        &self,
        caller: &Address,
        user: Address,
        flag: bool,
    ) -> Result<(), LedgerError> {
        if !self.variant().has_fees() {
            return Err(self.unsupported("set_premium_user"));
        }
        let _scope = self.enter("set_premium_user")?;
        self.require_owner(caller, "set_premium_user")?;
        self.state.borrow_mut().fees.set_premium(user, flag);
        tracing::info!(user = %user, flag, "premium flag updated");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Current fee rate in basis points.
    pub fn fee(&self) -> u16 {
        self.state.borrow().fees.rate()
    }

    /// The fee a caller would pay on `total` at the current rate.
    pub fn calculate_fee(&self, caller: &Address, total: Amount) -> Amount {
        if !self.variant().has_fees() {
            return 0;
        }
        self.state.borrow().fees.calculate_fee(caller, total)
    }

    pub fn balance_of(&self, asset: &Asset, payee: &Address) -> Amount {
        self.state.borrow().escrow.balance_of(asset, payee)
    }

    pub fn accumulated_fees(&self, asset: &Asset) -> Amount {
        self.state.borrow().fees.pool(asset)
    }

    pub fn is_premium_user(&self, addr: &Address) -> bool {
        self.state.borrow().fees.is_premium(addr)
    }

    pub fn version(&self) -> &'static str {
        self.variant().version()
    }

    /// Every committed event, oldest first.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.state.borrow().events.all().to_vec()
    }

    /// Whether a guarded operation is in flight.
    pub fn is_locked(&self) -> bool {
        self.guard.is_locked()
    }

    /// Price a request without running it. Fee-bearing variants include the
    /// caller's fee.
    pub fn quote(&self, request: &DistributionRequest) -> Result<Quote, LedgerError> {
        let validated = request.validate(MAX_PAYEES)?;
        let fee = self.calculate_fee(&request.caller, validated.total);
        let required = validated
            .total
            .checked_add(fee)
            .ok_or(LedgerError::Overflow)?;
        Ok(Quote {
            total: validated.total,
            fee,
            required,
        })
    }

    pub(crate) fn state(&self) -> Ref<'_, LedgerState> {
        self.state.borrow()
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn enter(&self, operation: &'static str) -> Result<GuardScope<'_>, LedgerError> {
        self.guard.enter().map_err(|err| {
            tracing::warn!(operation, "reentrant call rejected");
            err
        })
    }

    fn require_owner(&self, caller: &Address, operation: &'static str) -> Result<(), LedgerError> {
        if *caller != self.owner {
            tracing::warn!(operation, caller = %caller, "unauthorized owner call");
            return Err(LedgerError::Unauthorized(*caller));
        }
        Ok(())
    }

    fn unsupported(&self, operation: &'static str) -> LedgerError {
        LedgerError::Unsupported {
            operation,
            variant: self.variant(),
        }
    }
}
