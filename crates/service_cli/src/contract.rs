//! Contract and market flags shared by the pricing commands.

use clap::{Args, ValueEnum};
use pricer_core::types::PricingResult;
use pricer_models::instruments::{Barrier, BarrierDirection, KnockType, OptionType, VanillaOption};

/// Payoff side
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Payoff {
    Call,
    Put,
}

/// Knock type
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Knock {
    In,
    Out,
}

/// Barrier side relative to spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Down,
    Up,
}

impl From<Payoff> for OptionType {
    fn from(p: Payoff) -> Self {
        match p {
            Payoff::Call => OptionType::Call,
            Payoff::Put => OptionType::Put,
        }
    }
}

impl From<Knock> for KnockType {
    fn from(k: Knock) -> Self {
        match k {
            Knock::In => KnockType::In,
            Knock::Out => KnockType::Out,
        }
    }
}

impl From<Direction> for BarrierDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Down => BarrierDirection::Down,
            Direction::Up => BarrierDirection::Up,
        }
    }
}

/// One barrier contract on one market
#[derive(Debug, Clone, Args)]
pub struct ContractArgs {
    /// Call or put
    #[arg(long, value_enum, default_value_t = Payoff::Call)]
    pub payoff: Payoff,

    /// Strike price
    #[arg(short = 'k', long)]
    pub strike: f64,

    /// Time to expiry in years
    #[arg(short = 't', long)]
    pub expiry: f64,

    /// Knock-in or knock-out
    #[arg(long, value_enum)]
    pub knock: Knock,

    /// Barrier below (down) or above (up) spot
    #[arg(long, value_enum)]
    pub direction: Direction,

    /// Barrier level
    #[arg(short = 'b', long)]
    pub barrier: f64,

    /// Rebate amount
    #[arg(long, default_value_t = 0.0)]
    pub rebate: f64,

    /// Spot price
    #[arg(short = 's', long)]
    pub spot: f64,

    /// Continuously compounded discount rate
    #[arg(short = 'r', long, allow_negative_numbers = true)]
    pub rate: f64,

    /// Cost of carry (rate minus dividend or foreign rate)
    #[arg(long, allow_negative_numbers = true)]
    pub carry: f64,

    /// Lognormal volatility
    #[arg(long)]
    pub vol: f64,
}

impl ContractArgs {
    /// Validated vanilla leg.
    pub fn option(&self) -> PricingResult<VanillaOption> {
        VanillaOption::new(self.strike, self.expiry, self.payoff.into())
    }

    /// Validated barrier.
    pub fn barrier(&self) -> PricingResult<Barrier> {
        Barrier::new(self.knock.into(), self.direction.into(), self.barrier)
    }
}
