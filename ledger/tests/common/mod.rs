#![allow(dead_code)]

use splitpay_ledger::{DistributionRequest, Ledger, LedgerError, Receipt};
use splitpay_nullables::NullAssetHost;
use splitpay_types::{Address, Amount, Asset, LedgerParams, Variant};

pub fn owner() -> Address {
    Address::repeat_byte(0x0f)
}

pub fn caller() -> Address {
    Address::repeat_byte(0xca)
}

pub fn token() -> Address {
    Address::repeat_byte(0x70)
}

pub fn payee(i: usize) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xb0;
    bytes[18..].copy_from_slice(&(i as u16).to_be_bytes());
    Address::new(bytes)
}

pub fn payees(n: usize) -> Vec<Address> {
    (0..n).map(payee).collect()
}

pub fn ledger(variant: Variant, fee_bps: u16) -> Ledger {
    let mut params = LedgerParams::for_variant(variant);
    params.initial_fee_bps = fee_bps;
    Ledger::new(owner(), params).expect("valid params")
}

/// A host where the caller holds plenty of native value and tokens.
pub fn funded_host() -> NullAssetHost {
    let host = NullAssetHost::new();
    host.fund(Asset::Native, caller(), 1_000_000_000);
    host.fund(Asset::Token(token()), caller(), 1_000_000_000);
    host
}

pub fn native_request(amounts: Vec<Amount>, attached: Amount) -> DistributionRequest {
    DistributionRequest::native(caller(), payees(amounts.len()), amounts, attached)
}

pub fn token_request(amounts: Vec<Amount>) -> DistributionRequest {
    DistributionRequest::token(caller(), token(), payees(amounts.len()), amounts)
}

/// Attach the request's native value, run `op`, and refund the attachment if
/// the ledger reverts, the way a host with whole-call rollback would.
pub fn with_attached(
    host: &NullAssetHost,
    request: &DistributionRequest,
    op: impl FnOnce() -> Result<Receipt, LedgerError>,
) -> Result<Receipt, LedgerError> {
    host.attach(request.caller, request.attached_value)
        .expect("caller can afford the attachment");
    let result = op();
    if result.is_err() {
        host.refund(request.caller, request.attached_value)
            .expect("custody still holds the attachment");
    }
    result
}
