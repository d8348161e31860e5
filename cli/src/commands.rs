//! Subcommand bodies. Each returns a serializable report; `main` prints it.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use splitpay_ledger::{PaymentGroup, Receipt};
use splitpay_types::{Address, Amount, Asset, Variant};

use crate::config::CliConfig;

/// Read a payment group from a TOML file and validate it.
pub fn load_group(path: &Path, max_payees: usize) -> anyhow::Result<PaymentGroup> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading group {}", path.display()))?;
    parse_group(&content, max_payees).with_context(|| format!("loading group {}", path.display()))
}

pub fn parse_group(text: &str, max_payees: usize) -> anyhow::Result<PaymentGroup> {
    let group: PaymentGroup = toml::from_str(text)?;
    group.validate(max_payees)?;
    Ok(group)
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub group: String,
    pub chain_id: u64,
    pub asset: Asset,
    pub payees: usize,
    pub total: Amount,
}

pub fn check(group: &PaymentGroup) -> anyhow::Result<CheckReport> {
    Ok(CheckReport {
        group: group.name.clone(),
        chain_id: group.chain_id,
        asset: group.asset(),
        payees: group.payees.len(),
        total: group.total()?,
    })
}

#[derive(Debug, Serialize)]
pub struct QuoteReport {
    pub group: String,
    pub variant: Variant,
    pub caller: Address,
    pub fee_bps: u16,
    pub premium: bool,
    pub total: Amount,
    pub fee: Amount,
    pub required: Amount,
    /// Native value to attach; zero for token groups.
    pub attach_value: Amount,
}

pub fn quote(config: &CliConfig, group: &PaymentGroup, caller: Address) -> anyhow::Result<QuoteReport> {
    let ledger = config.build_ledger()?;
    let quote = ledger.quote(&group.to_request(caller, 0))?;
    Ok(QuoteReport {
        group: group.name.clone(),
        variant: ledger.variant(),
        caller,
        fee_bps: ledger.fee(),
        premium: ledger.is_premium_user(&caller),
        total: quote.total,
        fee: quote.fee,
        required: quote.required,
        attach_value: if group.uses_native_currency() {
            quote.required
        } else {
            0
        },
    })
}

#[derive(Debug, Serialize)]
pub struct PayeeBalance {
    pub payee: Address,
    /// Held by the payee on the host after the run.
    pub wallet: Amount,
    /// Still credited in the ledger's escrow.
    pub escrow: Amount,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub group: String,
    pub variant: Variant,
    pub version: &'static str,
    pub receipt: Receipt,
    pub balances: Vec<PayeeBalance>,
    pub accumulated_fees: Amount,
}

/// Run one distribution of `group` against an in-memory host seeded from
/// the config.
pub fn simulate(
    config: &CliConfig,
    group: &PaymentGroup,
    caller: Address,
    escrow: bool,
) -> anyhow::Result<SimulationReport> {
    let ledger = config.build_ledger()?;
    let host = config.seed_host();
    let asset = group.asset();

    let quote = ledger.quote(&group.to_request(caller, 0))?;
    let attached = if asset.is_native() { quote.required } else { 0 };
    let request = group.to_request(caller, attached);
    if attached > 0 {
        host.attach(caller, attached)
            .context("caller cannot cover the attached value")?;
    }

    let result = if escrow {
        ledger.distribute_to_escrow(&request, &host)
    } else {
        ledger.pay(&request, &host)
    };
    let receipt = match result {
        Ok(receipt) => receipt,
        Err(err) => {
            if attached > 0 {
                if let Err(refund) = host.refund(caller, attached) {
                    tracing::warn!(error = %refund, "could not refund attached value");
                }
            }
            return Err(err.into());
        }
    };

    let balances = group
        .payees
        .iter()
        .map(|p| PayeeBalance {
            payee: p.wallet,
            wallet: host.balance(&asset, &p.wallet),
            escrow: ledger.balance_of(&asset, &p.wallet),
        })
        .collect();

    Ok(SimulationReport {
        group: group.name.clone(),
        variant: ledger.variant(),
        version: ledger.version(),
        accumulated_fees: ledger.accumulated_fees(&asset),
        receipt,
        balances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitpay_ledger::LedgerError;

    const GROUP: &str = r#"
        name = "contributors"
        chain_id = 1

        [[payee]]
        name = "ana"
        wallet = "0x0101010101010101010101010101010101010101"
        amount = 100

        [[payee]]
        name = "bo"
        wallet = "0x0202020202020202020202020202020202020202"
        amount = 200
    "#;

    const CONFIG: &str = r#"
        owner = "0x0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f"

        [params]
        variant = "escrow-fee"
        initial_fee_bps = 100

        [[balance]]
        holder = "0xcacacacacacacacacacacacacacacacacacacaca"
        amount = 1000
    "#;

    fn caller() -> Address {
        Address::repeat_byte(0xca)
    }

    #[test]
    fn check_reports_total() {
        let group = parse_group(GROUP, 500).unwrap();
        let report = check(&group).unwrap();
        assert_eq!(report.payees, 2);
        assert_eq!(report.total, 300);
        assert_eq!(report.asset, Asset::Native);
    }

    #[test]
    fn invalid_group_fails_to_load() {
        let err = parse_group(GROUP, 1).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::InvalidGroup(_))
        ));
    }

    #[test]
    fn quote_includes_fee() {
        let config = CliConfig::from_toml_str(CONFIG).unwrap();
        let group = parse_group(GROUP, 500).unwrap();
        let report = quote(&config, &group, caller()).unwrap();
        assert_eq!(report.fee, 3);
        assert_eq!(report.attach_value, 303);
        assert!(!report.premium);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["required"], 303);
        assert_eq!(json["variant"], "escrow-fee");
    }

    #[test]
    fn simulate_direct_and_escrow() {
        let config = CliConfig::from_toml_str(CONFIG).unwrap();
        let group = parse_group(GROUP, 500).unwrap();

        let direct = simulate(&config, &group, caller(), false).unwrap();
        assert_eq!(direct.balances[1].wallet, 200);
        assert_eq!(direct.balances[1].escrow, 0);
        assert_eq!(direct.accumulated_fees, 3);
        assert_eq!(direct.receipt.events.len(), 2);

        let escrowed = simulate(&config, &group, caller(), true).unwrap();
        assert_eq!(escrowed.balances[0].wallet, 0);
        assert_eq!(escrowed.balances[0].escrow, 100);
        assert_eq!(escrowed.version, "1.3.0-escrow-fee");
    }

    #[test]
    fn simulate_without_funds_fails() {
        let config = CliConfig::default();
        let group = parse_group(GROUP, 500).unwrap();
        assert!(simulate(&config, &group, caller(), false).is_err());
    }
}
