//! Price command implementation
//!
//! Prices one barrier option and reports the vanilla price alongside.

use pricer_models::analytical::barrier::{BlackBarrierPricer, DispatchKey};
use pricer_models::analytical::BlackScholes;
use serde::Serialize;
use tracing::info;

use super::{fmt_num, print_json, render_table};
use crate::config::OutputFormat;
use crate::contract::ContractArgs;
use crate::Result;

/// Result of the price command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceReport {
    /// Dispatch case, e.g. `down-out call K>H`
    pub case: String,
    /// Term combination, e.g. `A-C+F`
    pub combination: String,
    /// Barrier option price
    pub price: f64,
    /// Vanilla price on the same market
    pub vanilla: f64,
}

/// Price a contract
pub fn evaluate(pricer: &BlackBarrierPricer, contract: &ContractArgs) -> Result<PriceReport> {
    let option = contract.option()?;
    let barrier = contract.barrier()?;
    let key = DispatchKey::for_contract(&option, &barrier);

    let price = pricer.price(
        &option,
        &barrier,
        contract.rebate,
        contract.spot,
        contract.carry,
        contract.rate,
        contract.vol,
    )?;
    let vanilla =
        BlackScholes::new(contract.spot, contract.rate, contract.carry, contract.vol)?.price(&option);

    Ok(PriceReport {
        case: key.to_string(),
        combination: key.combination().label(),
        price,
        vanilla,
    })
}

/// Run the price command
pub fn run(pricer: &BlackBarrierPricer, contract: &ContractArgs, format: OutputFormat) -> Result<()> {
    info!(spot = contract.spot, strike = contract.strike, level = contract.barrier, "pricing");
    let report = evaluate(pricer, contract)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            let rows = vec![
                vec!["Case".to_string(), report.case.clone()],
                vec!["Combination".to_string(), report.combination.clone()],
                vec!["Price".to_string(), fmt_num(report.price)],
                vec!["Vanilla".to_string(), fmt_num(report.vanilla)],
            ];
            println!("{}", render_table(&["Field", "Value"], &rows));
        }
    }
    Ok(())
}
