//! splitpay: check, price, and simulate payment-group distributions.

mod commands;
mod config;

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use splitpay_types::{Address, MAX_PAYEES};
use splitpay_utils::LogFormat;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "splitpay", version, about = "Payment-distribution ledger tools")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "SPLITPAY_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SPLITPAY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format: "human" or "json".
    #[arg(long, env = "SPLITPAY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Override the configured fee rate, in basis points.
    #[arg(long, env = "SPLITPAY_FEE_BPS")]
    fee_bps: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Validate a payment group and print its payee count and total.
    Check {
        #[arg(long)]
        group: PathBuf,
    },
    /// Print total, fee, and required value for one payment of a group.
    Quote {
        #[arg(long)]
        group: PathBuf,
        /// Paying address; decides premium exemption.
        #[arg(long, default_value_t = Address::ZERO)]
        caller: Address,
    },
    /// Run one payment of a group against an in-memory host.
    Simulate {
        #[arg(long)]
        group: PathBuf,
        #[arg(long)]
        caller: Address,
        /// Credit escrow balances instead of paying directly.
        #[arg(long)]
        escrow: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(fee_bps) = cli.fee_bps {
        config.params.initial_fee_bps = fee_bps;
        config.params.validate()?;
    }

    splitpay_utils::init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    match cli.command {
        Command::Check { group } => {
            let group = commands::load_group(&group, MAX_PAYEES)?;
            print_json(&commands::check(&group)?)
        }
        Command::Quote { group, caller } => {
            let group = commands::load_group(&group, MAX_PAYEES)?;
            print_json(&commands::quote(&config, &group, caller)?)
        }
        Command::Simulate {
            group,
            caller,
            escrow,
        } => {
            let group = commands::load_group(&group, MAX_PAYEES)?;
            tracing::info!(
                group = %group.name,
                variant = %config.params.variant,
                escrow,
                "simulating distribution"
            );
            print_json(&commands::simulate(&config, &group, caller, escrow)?)
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
