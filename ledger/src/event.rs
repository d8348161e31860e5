//! The append-only event log.

use serde::{Deserialize, Serialize};
use splitpay_types::{Address, Amount, Asset};

/// An observable ledger event.
///
/// Native-asset events carry `Asset::Native`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A payee was paid or credited as part of a distribution.
    Payment {
        asset: Asset,
        payee: Address,
        amount: Amount,
    },
    /// An escrow balance or a fee pool was paid out.
    Withdrawal {
        asset: Asset,
        payee: Address,
        amount: Amount,
    },
}

impl LedgerEvent {
    pub fn amount(&self) -> Amount {
        match self {
            LedgerEvent::Payment { amount, .. } | LedgerEvent::Withdrawal { amount, .. } => *amount,
        }
    }

    pub fn payee(&self) -> &Address {
        match self {
            LedgerEvent::Payment { payee, .. } | LedgerEvent::Withdrawal { payee, .. } => payee,
        }
    }
}

/// Events committed so far, oldest first.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// Current length, used as a rollback mark.
    pub fn mark(&self) -> usize {
        self.events.len()
    }

    /// Drop every event emitted after `mark`.
    pub fn truncate(&mut self, mark: usize) {
        self.events.truncate(mark);
    }

    pub fn since(&self, mark: usize) -> &[LedgerEvent] {
        self.events.get(mark..).unwrap_or(&[])
    }

    pub fn all(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(byte: u8, amount: Amount) -> LedgerEvent {
        LedgerEvent::Payment {
            asset: Asset::Native,
            payee: Address::repeat_byte(byte),
            amount,
        }
    }

    #[test]
    fn truncate_to_mark() {
        let mut log = EventLog::new();
        log.emit(payment(1, 10));
        let mark = log.mark();
        log.emit(payment(2, 20));
        log.emit(payment(3, 30));
        assert_eq!(log.since(mark).len(), 2);
        log.truncate(mark);
        assert_eq!(log.all(), &[payment(1, 10)]);
        assert!(log.since(5).is_empty());
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(payment(1, 7)).unwrap();
        assert_eq!(json["event"], "payment");
        assert_eq!(json["asset"], "native");
        assert_eq!(json["amount"], 7);
    }
}
