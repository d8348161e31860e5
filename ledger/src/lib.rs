//! Payment-distribution ledger.
//!
//! One inbound deposit from one caller is fanned out to a list of payees in a
//! single all-or-nothing operation. Depending on the [`Variant`] the ledger
//! was built with, payees are paid directly or credited escrow balances they
//! withdraw later, and a capped basis-point fee may accrue into a per-asset
//! pool the owner withdraws.
//!
//! This crate handles:
//! - Request validation and settlement planning per variant
//! - Escrow balances and pull-based withdrawal
//! - Fee rate, premium exemptions, and fee pools
//! - Reentrancy protection and journaled rollback around external transfers
//! - Snapshots for persistence and reusable payment groups
//!
//! [`Variant`]: splitpay_types::Variant

pub mod combined;
pub mod distribution;
pub mod error;
pub mod escrow;
pub mod event;
pub mod fees;
pub mod group;
pub mod guard;
pub mod host;
pub mod journal;
pub mod ledger;
pub mod request;
pub mod settlement;
pub mod snapshot;
pub mod state;

pub use error::LedgerError;
pub use escrow::EscrowBook;
pub use event::{EventLog, LedgerEvent};
pub use fees::FeeBook;
pub use group::{GroupPayee, PaymentGroup, TokenRef};
pub use guard::ReentrancyGuard;
pub use host::{AssetHost, HostError};
pub use ledger::{Ledger, Quote, Receipt};
pub use request::DistributionRequest;
pub use settlement::{DistributionKind, Payout, Routing, Settlement};
pub use snapshot::{BalanceEntry, FeePoolEntry, LedgerSnapshot};
