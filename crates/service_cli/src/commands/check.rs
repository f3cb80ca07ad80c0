//! Check command implementation
//!
//! Prints the effective configuration and runs an in-out parity self-check:
//! without a rebate, knock-in plus knock-out must reproduce the vanilla for
//! every dispatch case.

use pricer_core::types::PricingResult;
use pricer_models::analytical::barrier::{BlackBarrierPricer, DispatchKey};
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::{Barrier, BarrierDirection, KnockType, OptionType, VanillaOption};
use serde::Serialize;
use tracing::{info, warn};

use super::{print_json, render_table};
use crate::config::{CliConfig, OutputFormat};
use crate::{CliError, Result};

/// Largest accepted relative parity error.
pub const PARITY_TOLERANCE: f64 = 1e-6;

const SPOT: f64 = 105.0;
const RATE: f64 = 0.05;
const CARRY: f64 = 0.03;
const VOL: f64 = 0.2;
const EXPIRY: f64 = 3.5068493150684934;

/// Parity result for one knock-in / knock-out pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParityCase {
    /// Knock-in dispatch case
    pub case: String,
    /// Strike
    pub strike: f64,
    /// Knock-in price
    pub knock_in: f64,
    /// Knock-out price
    pub knock_out: f64,
    /// Vanilla price
    pub vanilla: f64,
    /// `|in + out - vanilla| / max(|vanilla|, 1)`
    pub error: f64,
}

/// Result of the check command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    /// Config file in use
    pub config_source: Option<String>,
    /// Effective log level
    pub log_level: String,
    /// Effective output format
    pub output_format: String,
    /// Engine zero tolerance
    pub zero_tolerance: f64,
    /// Parity results
    pub cases: Vec<ParityCase>,
    /// Worst parity error
    pub max_error: f64,
    /// `max_error <= PARITY_TOLERANCE`
    pub passed: bool,
}

/// In-out parity over both directions, three strikes and both payoffs
pub fn parity_cases(pricer: &BlackBarrierPricer) -> PricingResult<Vec<ParityCase>> {
    let vanilla_model = BlackScholes::new(SPOT, RATE, CARRY, VOL)?;
    let mut cases = Vec::new();

    for (direction, level) in [(BarrierDirection::Down, 90.0), (BarrierDirection::Up, 110.0)] {
        let knock_in = Barrier::new(KnockType::In, direction, level)?;
        let knock_out = knock_in.with_knock_type(KnockType::Out);

        for strike in [85.0, 100.0, 120.0] {
            for option_type in [OptionType::Call, OptionType::Put] {
                let option = VanillaOption::new(strike, EXPIRY, option_type)?;
                let in_price = pricer.price(&option, &knock_in, 0.0, SPOT, CARRY, RATE, VOL)?;
                let out_price = pricer.price(&option, &knock_out, 0.0, SPOT, CARRY, RATE, VOL)?;
                let vanilla = vanilla_model.price(&option);

                cases.push(ParityCase {
                    case: DispatchKey::for_contract(&option, &knock_in).to_string(),
                    strike,
                    knock_in: in_price,
                    knock_out: out_price,
                    vanilla,
                    error: (in_price + out_price - vanilla).abs() / vanilla.abs().max(1.0),
                });
            }
        }
    }
    Ok(cases)
}

/// Build the check report
pub fn evaluate(pricer: &BlackBarrierPricer, config: &CliConfig) -> Result<CheckReport> {
    let cases = parity_cases(pricer)?;
    let max_error = cases.iter().map(|c| c.error).fold(0.0, f64::max);

    Ok(CheckReport {
        config_source: config.source.as_ref().map(|p| p.display().to_string()),
        log_level: config.log_level.to_string(),
        output_format: config.output_format.to_string(),
        zero_tolerance: config.zero_tolerance,
        cases,
        max_error,
        passed: max_error <= PARITY_TOLERANCE,
    })
}

/// Run the check command
pub fn run(pricer: &BlackBarrierPricer, config: &CliConfig) -> Result<()> {
    info!("Checking configuration and engine...");
    let report = evaluate(pricer, config)?;

    match config.output_format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            let settings = vec![
                vec![
                    "config".to_string(),
                    report
                        .config_source
                        .clone()
                        .unwrap_or_else(|| "(defaults)".to_string()),
                ],
                vec!["log_level".to_string(), report.log_level.clone()],
                vec!["output_format".to_string(), report.output_format.clone()],
                vec!["zero_tolerance".to_string(), format!("{:e}", report.zero_tolerance)],
            ];
            println!("{}", render_table(&["Setting", "Value"], &settings));

            let rows: Vec<Vec<String>> = report
                .cases
                .iter()
                .map(|c| {
                    vec![
                        c.case.clone(),
                        format!("{}", c.strike),
                        format!("{:.10}", c.knock_in + c.knock_out),
                        format!("{:.10}", c.vanilla),
                        format!("{:.2e}", c.error),
                    ]
                })
                .collect();
            println!(
                "{}",
                render_table(&["Case", "Strike", "In + Out", "Vanilla", "Error"], &rows)
            );
        }
    }

    if report.passed {
        info!(max_error = report.max_error, "parity self-check passed");
        Ok(())
    } else {
        warn!(max_error = report.max_error, "parity self-check failed");
        Err(CliError::SelfCheck(format!(
            "max parity error {:.3e} exceeds {:.0e}",
            report.max_error, PARITY_TOLERANCE
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_parity_self_check_passes() {
        let pricer = BlackBarrierPricer::new();
        let report = evaluate(&pricer, &CliConfig::default()).unwrap();
        assert_eq!(report.cases.len(), 12);
        assert!(report.passed, "max error {}", report.max_error);
        assert!(report.max_error < 1e-10);
    }

    #[test]
    fn test_parity_covers_every_knock_in_case() {
        let pricer = BlackBarrierPricer::new();
        let cases: BTreeSet<String> = parity_cases(&pricer)
            .unwrap()
            .into_iter()
            .map(|c| c.case)
            .collect();
        assert_eq!(cases.len(), 8);
    }

    #[test]
    fn test_report_carries_config() {
        let pricer = BlackBarrierPricer::new();
        let config = CliConfig {
            zero_tolerance: 1e-12,
            ..Default::default()
        };
        let report = evaluate(&pricer, &config).unwrap();
        assert_eq!(report.zero_tolerance, 1e-12);
        assert_eq!(report.log_level, "warn");
        assert_eq!(report.output_format, "table");
        assert!(report.config_source.is_none());
    }
}
