//! Amount arithmetic and basis-point constants.
//!
//! Amounts are raw integer units (u128). All aggregate arithmetic is checked;
//! callers map `None` to their own overflow error.

/// Raw units of any asset.
pub type Amount = u128;

/// 1 basis point = 1/10_000.
pub const BPS_DIVISOR: u128 = 10_000;

/// Hard cap on the fee rate: 100 bps = 1%.
pub const MAX_FEE_BPS: u16 = 100;

/// Maximum number of payees in a single distribution.
pub const MAX_PAYEES: usize = 500;

/// Sum a list of amounts, returning `None` on overflow.
pub fn checked_sum(amounts: &[Amount]) -> Option<Amount> {
    amounts
        .iter()
        .try_fold(0u128, |acc, amount| acc.checked_add(*amount))
}

/// `floor(amount * bps / 10_000)` without forming the full product, so it
/// never overflows. Rates above 10_000 bps are clamped to 100%.
pub fn apply_bps(amount: Amount, bps: u16) -> Amount {
    let bps = u128::from(bps).min(BPS_DIVISOR);
    (amount / BPS_DIVISOR) * bps + (amount % BPS_DIVISOR) * bps / BPS_DIVISOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_detects_overflow() {
        assert_eq!(checked_sum(&[1, 2, 3]), Some(6));
        assert_eq!(checked_sum(&[]), Some(0));
        assert_eq!(checked_sum(&[u128::MAX, 1]), None);
    }

    #[test]
    fn bps_floors() {
        assert_eq!(apply_bps(300, 100), 3);
        assert_eq!(apply_bps(99, 100), 0);
        assert_eq!(apply_bps(10_000, 1), 1);
        assert_eq!(apply_bps(20_199, 100), 201);
        assert_eq!(apply_bps(u128::MAX, 0), 0);
        assert_eq!(apply_bps(u128::MAX, 100), u128::MAX / 100);
        assert_eq!(apply_bps(u128::MAX, u16::MAX), u128::MAX);
    }
}
