//! Ladder command implementation
//!
//! Prices the contract over a grid of spots in parallel. One pricer is
//! shared by every Rayon worker.

use pricer_core::types::PricingResult;
use pricer_models::analytical::barrier::BlackBarrierPricer;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use super::{fmt_num, print_json, render_table};
use crate::config::OutputFormat;
use crate::contract::ContractArgs;
use crate::{CliError, Result};

/// One ladder point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LadderRow {
    /// Spot
    pub spot: f64,
    /// Price
    pub value: f64,
    /// ∂V/∂S
    pub delta: f64,
    /// ∂²V/∂S²
    pub gamma: f64,
    /// ∂V/∂σ
    pub vega: f64,
}

/// Evenly spaced spots on `[centre·(1 - width), centre·(1 + width)]`.
pub fn ladder_spots(centre: f64, width: f64, steps: usize) -> Result<Vec<f64>> {
    if steps < 2 {
        return Err(CliError::InvalidArgument(format!(
            "ladder needs at least 2 steps, got {}",
            steps
        )));
    }
    if !(width > 0.0 && width < 1.0) {
        return Err(CliError::InvalidArgument(format!(
            "ladder width must be in (0, 1), got {}",
            width
        )));
    }
    let low = centre * (1.0 - width);
    let step = 2.0 * centre * width / (steps - 1) as f64;
    Ok((0..steps).map(|i| low + step * i as f64).collect())
}

/// Price every ladder spot on the live side of the barrier
pub fn evaluate(
    pricer: &BlackBarrierPricer,
    contract: &ContractArgs,
    width: f64,
    steps: usize,
) -> Result<Vec<LadderRow>> {
    let option = contract.option()?;
    let barrier = contract.barrier()?;

    let (alive, breached): (Vec<f64>, Vec<f64>) = ladder_spots(contract.spot, width, steps)?
        .into_iter()
        .partition(|&s| !barrier.is_breached_by(s));
    if !breached.is_empty() {
        warn!(
            skipped = breached.len(),
            level = barrier.level(),
            "ladder spots beyond the barrier skipped"
        );
    }

    let rows = alive
        .par_iter()
        .map(|&spot| {
            pricer
                .price_with_derivatives(
                    &option,
                    &barrier,
                    contract.rebate,
                    spot,
                    contract.carry,
                    contract.rate,
                    contract.vol,
                )
                .map(|r| LadderRow {
                    spot,
                    value: r.value,
                    delta: r.derivatives.spot(),
                    gamma: r.derivatives.spot_spot(),
                    vega: r.derivatives.volatility(),
                })
        })
        .collect::<PricingResult<Vec<_>>>()?;

    Ok(rows)
}

/// Run the ladder command
pub fn run(
    pricer: &BlackBarrierPricer,
    contract: &ContractArgs,
    width: f64,
    steps: usize,
    format: OutputFormat,
) -> Result<()> {
    info!(centre = contract.spot, width, steps, "pricing spot ladder");
    let rows = evaluate(pricer, contract, width, steps)?;

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => {
            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        format!("{:.4}", r.spot),
                        fmt_num(r.value),
                        fmt_num(r.delta),
                        fmt_num(r.gamma),
                        fmt_num(r.vega),
                    ]
                })
                .collect();
            println!(
                "{}",
                render_table(&["Spot", "Value", "Delta", "Gamma", "Vega"], &cells)
            );
        }
    }
    Ok(())
}
