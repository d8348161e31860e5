//! Escrow with fees, composed in a single pass.
//!
//! Payees are credited their gross amounts and the fee is pooled separately;
//! the caller pays `total + fee`. The fee is computed once per request.

use crate::error::LedgerError;
use crate::escrow::EscrowBook;
use crate::fees::FeeBook;
use crate::request::ValidatedRequest;
use crate::settlement::{Routing, Settlement};

/// Plan a fee-bearing escrow distribution against both books.
pub fn plan(
    validated: &ValidatedRequest<'_>,
    escrow: &EscrowBook,
    fees: &FeeBook,
) -> Result<Settlement, LedgerError> {
    let request = validated.request;
    let fee = fees.calculate_fee(&request.caller, validated.total);
    let settlement = Settlement::build(validated, Routing::Escrow, fee)?;
    escrow.check_credits(&settlement.asset, &settlement.payouts)?;
    fees.check_accrual(&settlement.asset, settlement.fee)?;
    Ok(settlement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::DistributionRequest;
    use splitpay_types::{Address, Asset};

    #[test]
    fn credits_gross_and_pools_fee() {
        let escrow = EscrowBook::new();
        let fees = FeeBook::new(100).unwrap();
        let token = Address::repeat_byte(0x70);
        let req = DistributionRequest::token(
            Address::repeat_byte(0xca),
            token,
            vec![Address::repeat_byte(1), Address::repeat_byte(2)],
            vec![1_000, 2_000],
        );
        let validated = req.validate(500).unwrap();
        let settlement = plan(&validated, &escrow, &fees).unwrap();
        assert_eq!(settlement.routing, Routing::Escrow);
        assert_eq!(settlement.payouts[0].amount, 1_000);
        assert_eq!(settlement.payouts[1].amount, 2_000);
        assert_eq!(settlement.fee, 30);
        assert_eq!(settlement.custody_pull, 3_030);
        assert_eq!(settlement.asset, Asset::Token(token));
    }

    #[test]
    fn full_pool_blocks_the_whole_plan() {
        let escrow = EscrowBook::new();
        let mut fees = FeeBook::new(100).unwrap();
        fees.set_pool(Asset::Native, u128::MAX);
        let req = DistributionRequest::native(
            Address::repeat_byte(0xca),
            vec![Address::repeat_byte(1)],
            vec![10_000],
            10_100,
        );
        let validated = req.validate(500).unwrap();
        assert!(matches!(plan(&validated, &escrow, &fees), Err(LedgerError::Overflow)));
    }
}
