//! Direct one-shot distribution.
//!
//! Each payee receives its amount during the call: native value leaves ledger
//! custody payee by payee, token value moves from the caller to each payee.

use splitpay_types::Asset;

use crate::error::LedgerError;
use crate::host::AssetHost;
use crate::request::ValidatedRequest;
use crate::settlement::{Routing, Settlement};

/// Plan a fee-free direct distribution.
pub fn plan(validated: &ValidatedRequest<'_>) -> Result<Settlement, LedgerError> {
    Settlement::build(validated, Routing::Direct, 0)
}

/// Transfer every payout of a direct settlement, in input order.
///
/// Zero-amount payouts are skipped. Stops at the first refused transfer.
pub fn execute_payouts(settlement: &Settlement, host: &dyn AssetHost) -> Result<(), LedgerError> {
    debug_assert_eq!(settlement.routing, Routing::Direct);
    for payout in settlement.payouts.iter().filter(|p| p.amount > 0) {
        match settlement.asset {
            Asset::Native => host.push(&settlement.asset, &payout.payee, payout.amount)?,
            Asset::Token(_) => host.transfer_from(
                &settlement.asset,
                &settlement.caller,
                &payout.payee,
                payout.amount,
            )?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::DistributionRequest;
    use splitpay_types::Address;

    #[test]
    fn plain_plan_has_no_fee() {
        let req = DistributionRequest::native(
            Address::repeat_byte(9),
            vec![Address::repeat_byte(1), Address::repeat_byte(2)],
            vec![40, 60],
            100,
        );
        let validated = req.validate(500).unwrap();
        let settlement = plan(&validated).unwrap();
        assert_eq!(settlement.fee, 0);
        assert_eq!(settlement.required, 100);
        assert_eq!(settlement.routing, Routing::Direct);
        assert_eq!(settlement.custody_pull, 0);
    }
}
