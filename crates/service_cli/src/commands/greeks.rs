//! Greeks command implementation
//!
//! Reports the price with its seven sensitivities, either from the adjoint
//! engine or by bump-and-revalue.

use clap::ValueEnum;
use pricer_models::analytical::barrier::{
    finite_difference_derivatives, BlackBarrierPricer, DispatchKey, FiniteDifferenceConfig,
    ValueDerivatives,
};
use serde::Serialize;
use tracing::info;

use super::{fmt_num, print_json, render_table};
use crate::config::OutputFormat;
use crate::contract::ContractArgs;
use crate::Result;

/// How derivatives are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GreeksMode {
    /// Analytic reverse-mode pass
    Adjoint,
    /// Bump-and-revalue
    Bump,
}

/// Result of the greeks command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GreeksReport {
    /// Derivative source
    pub mode: GreeksMode,
    /// Dispatch case
    pub case: String,
    /// Price
    pub value: f64,
    /// ∂V/∂S
    pub spot: f64,
    /// ∂V/∂K
    pub strike: f64,
    /// ∂V/∂r
    pub rate: f64,
    /// ∂V/∂b
    pub cost_of_carry: f64,
    /// ∂V/∂σ
    pub volatility: f64,
    /// ∂V/∂T
    pub time: f64,
    /// ∂²V/∂S²
    pub spot_spot: f64,
}

impl GreeksReport {
    fn new(mode: GreeksMode, case: String, result: &ValueDerivatives) -> Self {
        let d = &result.derivatives;
        Self {
            mode,
            case,
            value: result.value,
            spot: d.spot(),
            strike: d.strike(),
            rate: d.rate(),
            cost_of_carry: d.cost_of_carry(),
            volatility: d.volatility(),
            time: d.time(),
            spot_spot: d.spot_spot(),
        }
    }
}

/// Price a contract with derivatives
pub fn evaluate(
    pricer: &BlackBarrierPricer,
    contract: &ContractArgs,
    mode: GreeksMode,
) -> Result<GreeksReport> {
    let option = contract.option()?;
    let barrier = contract.barrier()?;
    let key = DispatchKey::for_contract(&option, &barrier);

    let result = match mode {
        GreeksMode::Adjoint => pricer.price_with_derivatives(
            &option,
            &barrier,
            contract.rebate,
            contract.spot,
            contract.carry,
            contract.rate,
            contract.vol,
        )?,
        GreeksMode::Bump => finite_difference_derivatives(
            pricer,
            &FiniteDifferenceConfig::default(),
            &option,
            &barrier,
            contract.rebate,
            contract.spot,
            contract.carry,
            contract.rate,
            contract.vol,
        )?,
    };

    Ok(GreeksReport::new(mode, key.to_string(), &result))
}

/// Run the greeks command
pub fn run(
    pricer: &BlackBarrierPricer,
    contract: &ContractArgs,
    mode: GreeksMode,
    format: OutputFormat,
) -> Result<()> {
    info!(?mode, spot = contract.spot, "computing sensitivities");
    let report = evaluate(pricer, contract, mode)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = [
                ("value", report.value),
                ("spot", report.spot),
                ("strike", report.strike),
                ("rate", report.rate),
                ("costOfCarry", report.cost_of_carry),
                ("volatility", report.volatility),
                ("time", report.time),
                ("spot²", report.spot_spot),
            ]
            .into_iter()
            .map(|(name, x)| vec![name.to_string(), fmt_num(x)])
            .collect();
            println!("{} ({:?})", report.case, report.mode);
            println!("{}", render_table(&["Output", "Value"], &rows));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::tests::sample;

    #[test]
    fn test_adjoint_and_bump_agree() {
        let pricer = BlackBarrierPricer::new();
        let adjoint = evaluate(&pricer, &sample(), GreeksMode::Adjoint).unwrap();
        let bump = evaluate(&pricer, &sample(), GreeksMode::Bump).unwrap();

        assert_eq!(adjoint.value, bump.value);
        for (a, b) in [
            (adjoint.spot, bump.spot),
            (adjoint.strike, bump.strike),
            (adjoint.rate, bump.rate),
            (adjoint.cost_of_carry, bump.cost_of_carry),
            (adjoint.volatility, bump.volatility),
            (adjoint.time, bump.time),
            (adjoint.spot_spot, bump.spot_spot),
        ] {
            assert!((a - b).abs() <= 1e-5 + 1e-4 * b.abs(), "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_mode_serialises_lowercase() {
        assert_eq!(serde_json::to_value(GreeksMode::Bump).unwrap(), "bump");
    }
}
