//! Abstract persistence traits for the splitpay ledger.
//!
//! Storage backends implement these traits; the ledger depends only on them
//! and serializes its own types into opaque bytes.

pub mod error;
pub mod ledger;

pub use error::StoreError;
pub use ledger::LedgerStore;
