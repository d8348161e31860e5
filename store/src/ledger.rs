use crate::StoreError;

/// Store trait for persisting ledger state to durable storage.
///
/// Values are opaque `Vec<u8>` so this crate does not depend on the ledger
/// crate. The ledger serializes and deserializes its own snapshot type.
pub trait LedgerStore {
    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
    fn delete_meta(&self, key: &[u8]) -> Result<(), StoreError>;
}
