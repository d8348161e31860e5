//! Nullable infrastructure for deterministic testing.
//!
//! The ledger's external collaborators (the asset host and durable storage)
//! are abstracted behind traits. This crate provides in-memory
//! implementations that:
//! - Keep every balance in memory and record every transfer
//! - Can be scripted: seeded balances, refused recipients, receive hooks
//! - Never touch the filesystem or network
//!
//! Usage: hand these to a `Ledger` in tests and simulations.

pub mod host;
pub mod store;

pub use host::{NullAssetHost, TransferKind, TransferRecord};
pub use store::NullStore;
