//! CLI configuration: ledger parameters, owner, logging, and seeded
//! simulation balances, loaded from TOML.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use splitpay_ledger::Ledger;
use splitpay_nullables::NullAssetHost;
use splitpay_types::{Address, Amount, Asset, LedgerParams};
use splitpay_utils::LogFormat;

/// A balance the simulated host starts with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedBalance {
    pub holder: Address,
    /// `None` seeds native value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Address>,
    pub amount: u64,
}

impl SeedBalance {
    pub fn asset(&self) -> Asset {
        self.token.map_or(Asset::Native, Asset::Token)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Ledger owner; receives withdrawn fees.
    #[serde(default = "default_owner")]
    pub owner: Address,

    /// `"human"` or `"json"`.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Tracing filter directive (e.g. `"info"`, `"warn,splitpay_ledger=debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Fee-exempt callers. Ignored by variants without a fee layer.
    #[serde(default)]
    pub premium_users: Vec<Address>,

    #[serde(default)]
    pub params: LedgerParams,

    #[serde(default, rename = "balance")]
    pub balances: Vec<SeedBalance>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_owner() -> Address {
    Address::ZERO
}

fn default_log_level() -> String {
    "info".into()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.params.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// A fresh ledger with the configured owner, parameters, and premium set.
    pub fn build_ledger(&self) -> anyhow::Result<Ledger> {
        let ledger = Ledger::new(self.owner, self.params.clone())?;
        if ledger.variant().has_fees() {
            for user in &self.premium_users {
                ledger.set_premium_user(&self.owner, *user, true)?;
            }
        } else if !self.premium_users.is_empty() {
            tracing::warn!(
                variant = %ledger.variant(),
                "premium users configured for a variant without fees, ignoring"
            );
        }
        Ok(ledger)
    }

    /// An in-memory host holding the seeded balances.
    pub fn seed_host(&self) -> NullAssetHost {
        let host = NullAssetHost::new();
        for seed in &self.balances {
            host.fund(seed.asset(), seed.holder, Amount::from(seed.amount));
        }
        host
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            premium_users: Vec::new(),
            params: LedgerParams::default(),
            balances: Vec::new(),
        }
    }
}
