use proptest::prelude::*;

use splitpay_types::{apply_bps, checked_sum, Address, BPS_DIVISOR, MAX_FEE_BPS};

proptest! {
    /// Any 20 bytes render to a string that parses back to the same address.
    #[test]
    fn address_text_form_is_stable(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::new(bytes);
        let text = addr.to_string();
        prop_assert_eq!(text.len(), 42);
        prop_assert_eq!(Address::parse(&text).unwrap(), addr);
    }

    /// A capped fee never exceeds 1% of the amount.
    #[test]
    fn capped_fee_is_at_most_one_percent(
        amount in any::<u128>(),
        bps in 0u16..=MAX_FEE_BPS,
    ) {
        prop_assert!(apply_bps(amount, bps) <= amount / 100);
    }

    /// Matches the direct product wherever the product fits.
    #[test]
    fn fee_matches_direct_product(
        amount in 0u128..u128::MAX / BPS_DIVISOR,
        bps in 0u16..=MAX_FEE_BPS,
    ) {
        prop_assert_eq!(apply_bps(amount, bps), amount * u128::from(bps) / BPS_DIVISOR);
    }

    /// Fee is monotonic in the rate.
    #[test]
    fn fee_monotonic_in_rate(
        amount in 0u128..1_000_000_000_000,
        a in 0u16..=MAX_FEE_BPS,
        b in 0u16..=MAX_FEE_BPS,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(apply_bps(amount, lo) <= apply_bps(amount, hi));
    }

    /// Checked sum agrees with plain summation when nothing overflows.
    #[test]
    fn checked_sum_matches_plain_sum(amounts in prop::collection::vec(0u128..u64::MAX as u128, 0..64)) {
        let plain: u128 = amounts.iter().sum();
        prop_assert_eq!(checked_sum(&amounts), Some(plain));
    }
}
