//! Barrier CLI - Command Line Operations for Black-model Barrier Pricing
//!
//! This is the operational entry point for the black-barrier pricing library.
//!
//! # Commands
//!
//! - `barrier price` - Price one barrier option next to its vanilla
//! - `barrier greeks --mode adjoint|bump` - Price plus the seven sensitivities
//! - `barrier ladder` - Price and Greeks over a spot ladder, in parallel
//! - `barrier check` - Show configuration and run the in-out parity self-check
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires configuration and
//! logging around the engines of `pricer_models`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pricer_models::analytical::barrier::BlackBarrierPricer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod contract;
mod error;

pub use error::{CliError, Result};

use commands::greeks::GreeksMode;
use config::{build_config, CliArgs};
use contract::ContractArgs;

/// Black-model single-barrier option pricer
#[derive(Parser)]
#[command(name = "barrier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (default: ./barrier.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Volatility or expiry at or below this take the deterministic branch
    #[arg(long, global = true)]
    zero_tolerance: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price one barrier option
    Price {
        #[command(flatten)]
        contract: ContractArgs,
    },

    /// Price plus sensitivities to spot, strike, rate, carry, volatility, time and spot twice
    Greeks {
        #[command(flatten)]
        contract: ContractArgs,

        /// Adjoint (analytic) or bump-and-revalue derivatives
        #[arg(long, value_enum, default_value_t = GreeksMode::Adjoint)]
        mode: GreeksMode,
    },

    /// Price and Greeks over a ladder of spots centred on --spot
    Ladder {
        #[command(flatten)]
        contract: ContractArgs,

        /// Relative half-width of the ladder
        #[arg(long, default_value_t = 0.2)]
        width: f64,

        /// Number of ladder points
        #[arg(long, default_value_t = 21)]
        steps: usize,
    },

    /// Check configuration and run the in-out parity self-check
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config_file: cli.config.clone(),
        log_level: cli
            .log_level
            .clone()
            .or_else(|| cli.verbose.then(|| "debug".to_string())),
        output_format: cli.format.clone(),
        zero_tolerance: cli.zero_tolerance,
    };
    let config = build_config(&args, |key| std::env::var(key).ok())?;

    // Initialise tracing; reports go to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::new(config.log_level.as_filter_str()))
        .init();

    debug!(?config, "configuration loaded");
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let pricer = BlackBarrierPricer::with_config(config.engine_config()?)?;
    let format = config.output_format;

    match cli.command {
        Commands::Price { contract } => commands::price::run(&pricer, &contract, format),
        Commands::Greeks { contract, mode } => {
            commands::greeks::run(&pricer, &contract, mode, format)
        }
        Commands::Ladder {
            contract,
            width,
            steps,
        } => commands::ladder::run(&pricer, &contract, width, steps, format),
        Commands::Check => commands::check::run(&pricer, &config),
    }
}
