//! Scoped reentrancy lock.

use std::cell::Cell;

use crate::error::LedgerError;

/// A single lock shared by every operation that transfers value out.
///
/// [`ReentrancyGuard::enter`] hands back a [`GuardScope`]; the lock is released
/// when the scope is dropped.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    locked: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock, or fail with [`LedgerError::Reentrant`] if it is held.
    pub fn enter(&self) -> Result<GuardScope<'_>, LedgerError> {
        if self.locked.replace(true) {
            return Err(LedgerError::Reentrant);
        }
        Ok(GuardScope { guard: self })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

/// Holds the lock for its lifetime.
#[must_use = "the lock is released as soon as the scope is dropped"]
pub struct GuardScope<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardScope<'_> {
    fn drop(&mut self) {
        self.guard.locked.set(false);
    }
}
