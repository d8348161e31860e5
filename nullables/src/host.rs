//! Nullable asset host: in-memory balances with scriptable recipients.

use splitpay_ledger::{AssetHost, HostError};
use splitpay_types::{Address, Amount, Asset};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Which host primitive moved the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferKind {
    /// Caller → ledger custody.
    Pull,
    /// Caller → payee.
    TransferFrom,
    /// Ledger custody → recipient.
    Push,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRecord {
    pub kind: TransferKind,
    pub asset: Asset,
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

type ReceiveHook = Rc<dyn Fn(&NullAssetHost)>;

/// A test host that keeps balances in memory.
///
/// Ledger custody is held under [`NullAssetHost::custody_account`]. Receive
/// hooks run after a push lands, which is where a hostile recipient would try
/// to re-enter the ledger.
pub struct NullAssetHost {
    custody: Address,
    balances: RefCell<HashMap<(Asset, Address), Amount>>,
    transfers: RefCell<Vec<TransferRecord>>,
    rejecting: RefCell<HashSet<Address>>,
    hooks: RefCell<HashMap<Address, ReceiveHook>>,
}

impl NullAssetHost {
    pub fn new() -> Self {
        Self::with_custody(Address::repeat_byte(0xee))
    }

    pub fn with_custody(custody: Address) -> Self {
        Self {
            custody,
            balances: RefCell::new(HashMap::new()),
            transfers: RefCell::new(Vec::new()),
            rejecting: RefCell::new(HashSet::new()),
            hooks: RefCell::new(HashMap::new()),
        }
    }

    /// The account that stands for ledger custody.
    pub fn custody_account(&self) -> Address {
        self.custody
    }

    /// Seed a holder's balance.
    pub fn fund(&self, asset: Asset, holder: Address, amount: Amount) {
        let mut balances = self.balances.borrow_mut();
        let entry = balances.entry((asset, holder)).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Move native value from `caller` into custody, as attaching it to a
    /// call would.
    pub fn attach(&self, caller: Address, amount: Amount) -> Result<(), HostError> {
        self.move_value(TransferKind::Pull, Asset::Native, caller, self.custody, amount)
    }

    /// Return native value from custody to `caller`, as a reverted call would.
    pub fn refund(&self, caller: Address, amount: Amount) -> Result<(), HostError> {
        self.move_value(TransferKind::Push, Asset::Native, self.custody, caller, amount)
    }

    pub fn balance(&self, asset: &Asset, holder: &Address) -> Amount {
        self.balances
            .borrow()
            .get(&(*asset, *holder))
            .copied()
            .unwrap_or(0)
    }

    /// What the ledger currently holds in `asset`.
    pub fn custody(&self, asset: &Asset) -> Amount {
        self.balance(asset, &self.custody)
    }

    /// Refuse every future transfer to `recipient`.
    pub fn reject_transfers_to(&self, recipient: Address) {
        self.rejecting.borrow_mut().insert(recipient);
    }

    pub fn accept_transfers_to(&self, recipient: &Address) {
        self.rejecting.borrow_mut().remove(recipient);
    }

    /// Run `hook` each time value is pushed to `recipient`.
    pub fn on_receive(&self, recipient: Address, hook: impl Fn(&NullAssetHost) + 'static) {
        self.hooks.borrow_mut().insert(recipient, Rc::new(hook));
    }

    /// Every transfer so far (for assertions).
    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.transfers.borrow().clone()
    }

    /// Clear recorded transfers; balances are kept.
    pub fn clear_transfers(&self) {
        self.transfers.borrow_mut().clear();
    }

    fn move_value(
        &self,
        kind: TransferKind,
        asset: Asset,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), HostError> {
        if self.rejecting.borrow().contains(&to) {
            return Err(HostError::Rejected {
                recipient: to,
                reason: "recipient refuses transfers".into(),
            });
        }
        let available = self.balance(&asset, &from);
        if available < amount {
            return Err(HostError::InsufficientFunds {
                asset,
                holder: from,
                available,
                needed: amount,
            });
        }
        {
            let mut balances = self.balances.borrow_mut();
            balances.insert((asset, from), available - amount);
            let entry = balances.entry((asset, to)).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
        self.transfers.borrow_mut().push(TransferRecord {
            kind,
            asset,
            from,
            to,
            amount,
        });
        Ok(())
    }
}

impl Default for NullAssetHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetHost for NullAssetHost {
    fn available(&self, asset: &Asset, holder: &Address) -> Amount {
        self.balance(asset, holder)
    }

    fn pull(&self, asset: &Asset, from: &Address, amount: Amount) -> Result<(), HostError> {
        self.move_value(TransferKind::Pull, *asset, *from, self.custody, amount)
    }

    fn transfer_from(
        &self,
        asset: &Asset,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), HostError> {
        self.move_value(TransferKind::TransferFrom, *asset, *from, *to, amount)
    }

    fn push(&self, asset: &Asset, to: &Address, amount: Amount) -> Result<(), HostError> {
        self.move_value(TransferKind::Push, *asset, self.custody, *to, amount)?;
        let hook = self.hooks.borrow().get(to).cloned();
        if let Some(hook) = hook {
            hook(self);
        }
        Ok(())
    }
}
