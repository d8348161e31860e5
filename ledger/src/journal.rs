//! Undo journal for the Effecting phase.
//!
//! Each write to a balance entry or fee pool records the value it replaced.
//! Rolling back replays the records newest-first and truncates the event log
//! to where it stood when the operation began.

use splitpay_types::{Address, Amount, Asset};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Undo {
    Balance {
        asset: Asset,
        payee: Address,
        previous: Amount,
    },
    FeePool {
        asset: Asset,
        previous: Amount,
    },
}

/// Writes made by one in-flight operation.
#[derive(Debug)]
#[must_use = "a journal must be committed or rolled back"]
pub struct Journal {
    entries: Vec<Undo>,
    event_mark: usize,
}

impl Journal {
    pub fn new(event_mark: usize) -> Self {
        Self {
            entries: Vec::new(),
            event_mark,
        }
    }

    pub fn record(&mut self, undo: Undo) {
        self.entries.push(undo);
    }

    pub fn event_mark(&self) -> usize {
        self.event_mark
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Undo records newest-first.
    pub fn into_undo(self) -> impl Iterator<Item = Undo> {
        self.entries.into_iter().rev()
    }

    /// Accept every write; nothing is kept.
    pub fn commit(self) {}
}
