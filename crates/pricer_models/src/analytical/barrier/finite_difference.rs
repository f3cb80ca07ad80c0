//! Bump-and-revalue sensitivities.
//!
//! Reference implementation of the derivative vector using repeated calls
//! to [`BlackBarrierPricer::price`]. Used to verify the adjoint engine and
//! exposed as an alternative mode by the command line.
//!
//! Central differences are used for the first-order slots and a three-point
//! stencil for gamma. A bump that would breach the barrier or push time or
//! volatility below zero switches that slot to a one-sided stencil.

use pricer_core::math::NormalDistribution;
use pricer_core::types::{PricingError, PricingResult};
use tracing::debug;

use super::pricer::BlackBarrierPricer;
use super::sensitivities::{DerivativeVector, Sensitivity, ValueDerivatives};
use crate::instruments::{Barrier, BarrierDirection, VanillaOption};

/// Configuration for bump-and-revalue derivatives.
///
/// # Default Values
///
/// | Parameter | Default | Description |
/// |-----------|---------|-------------|
/// | `relative_bump` | 1e-6 | First-order bump, scaled by `max(|x|, 1)` |
/// | `gamma_relative_bump` | 1e-4 | Spot bump for the second difference, scaled by spot |
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiniteDifferenceConfig {
    /// Relative first-order bump (default: 1e-6).
    pub relative_bump: f64,
    /// Relative spot bump for gamma (default: 1e-4).
    pub gamma_relative_bump: f64,
}

impl Default for FiniteDifferenceConfig {
    fn default() -> Self {
        Self {
            relative_bump: 1e-6,
            gamma_relative_bump: 1e-4,
        }
    }
}

impl FiniteDifferenceConfig {
    /// Creates a new builder for constructing a `FiniteDifferenceConfig`.
    pub fn builder() -> FiniteDifferenceConfigBuilder {
        FiniteDifferenceConfigBuilder::default()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PricingResult<()> {
        for (name, bump) in [
            ("relative_bump", self.relative_bump),
            ("gamma_relative_bump", self.gamma_relative_bump),
        ] {
            if !(bump > 0.0 && bump <= 0.1) {
                return Err(PricingError::ConfigError(format!(
                    "{} must be in (0, 0.1], got {}",
                    name, bump
                )));
            }
        }
        Ok(())
    }

    /// Absolute bump for an input currently at `x`.
    #[inline]
    pub fn bump_for(&self, x: f64) -> f64 {
        self.relative_bump * x.abs().max(1.0)
    }
}

/// Builder for [`FiniteDifferenceConfig`].
#[derive(Debug, Default)]
pub struct FiniteDifferenceConfigBuilder {
    relative_bump: Option<f64>,
    gamma_relative_bump: Option<f64>,
}

impl FiniteDifferenceConfigBuilder {
    /// Sets the relative first-order bump (default: 1e-6).
    pub fn relative_bump(mut self, bump: f64) -> Self {
        self.relative_bump = Some(bump);
        self
    }

    /// Sets the relative gamma bump (default: 1e-4).
    pub fn gamma_relative_bump(mut self, bump: f64) -> Self {
        self.gamma_relative_bump = Some(bump);
        self
    }

    /// Builds the configuration, validating all parameters.
    pub fn build(self) -> PricingResult<FiniteDifferenceConfig> {
        let defaults = FiniteDifferenceConfig::default();
        let config = FiniteDifferenceConfig {
            relative_bump: self.relative_bump.unwrap_or(defaults.relative_bump),
            gamma_relative_bump: self
                .gamma_relative_bump
                .unwrap_or(defaults.gamma_relative_bump),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Which side of the current point a stencil may evaluate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stencil {
    Central,
    Forward,
    Backward,
}

impl Stencil {
    fn pick(up_allowed: bool, down_allowed: bool) -> Self {
        match (up_allowed, down_allowed) {
            (true, true) => Stencil::Central,
            (true, false) => Stencil::Forward,
            _ => Stencil::Backward,
        }
    }
}

fn first_difference<F>(f: F, x: f64, h: f64, base: f64, stencil: Stencil) -> PricingResult<f64>
where
    F: Fn(f64) -> PricingResult<f64>,
{
    Ok(match stencil {
        Stencil::Central => (f(x + h)? - f(x - h)?) / (2.0 * h),
        Stencil::Forward => (f(x + h)? - base) / h,
        Stencil::Backward => (base - f(x - h)?) / h,
    })
}

fn second_difference<F>(f: F, x: f64, h: f64, base: f64, stencil: Stencil) -> PricingResult<f64>
where
    F: Fn(f64) -> PricingResult<f64>,
{
    Ok(match stencil {
        Stencil::Central => (f(x + h)? - 2.0 * base + f(x - h)?) / (h * h),
        Stencil::Forward => (f(x + 2.0 * h)? - 2.0 * f(x + h)? + base) / (h * h),
        Stencil::Backward => (base - 2.0 * f(x - h)? + f(x - 2.0 * h)?) / (h * h),
    })
}

/// Derivative vector by bump-and-revalue.
///
/// # Examples
/// ```
/// use pricer_models::analytical::barrier::{
///     finite_difference_derivatives, BlackBarrierPricer, FiniteDifferenceConfig,
/// };
/// use pricer_models::instruments::{Barrier, VanillaOption};
///
/// let pricer = BlackBarrierPricer::new();
/// let option = VanillaOption::put(100.0, 1.0).unwrap();
/// let barrier = Barrier::up_out(120.0).unwrap();
///
/// let bumped = finite_difference_derivatives(
///     &pricer, &FiniteDifferenceConfig::default(),
///     &option, &barrier, 0.0, 100.0, 0.01, 0.03, 0.25,
/// ).unwrap();
/// let adjoint = pricer
///     .price_with_derivatives(&option, &barrier, 0.0, 100.0, 0.01, 0.03, 0.25)
///     .unwrap();
/// assert!((bumped.derivatives.spot() - adjoint.derivatives.spot()).abs() < 1e-6);
/// ```
///
/// # Errors
/// Propagates any error of the underlying [`price`](BlackBarrierPricer::price) calls.
#[allow(clippy::too_many_arguments)]
pub fn finite_difference_derivatives<N: NormalDistribution>(
    pricer: &BlackBarrierPricer<N>,
    config: &FiniteDifferenceConfig,
    option: &VanillaOption,
    barrier: &Barrier,
    rebate: f64,
    spot: f64,
    cost_of_carry: f64,
    rate: f64,
    volatility: f64,
) -> PricingResult<ValueDerivatives> {
    config.validate()?;
    let price = |o: &VanillaOption, s: f64, b: f64, r: f64, v: f64| {
        pricer.price(o, barrier, rebate, s, b, r, v)
    };
    let base = price(option, spot, cost_of_carry, rate, volatility)?;

    let spot_stencil = |h: f64| {
        let (up, down) = match barrier.direction() {
            BarrierDirection::Down => (true, spot - 2.0 * h >= barrier.level()),
            BarrierDirection::Up => (spot + 2.0 * h <= barrier.level(), true),
        };
        Stencil::pick(up, down)
    };

    let mut d = DerivativeVector::zeros();

    let h = config.bump_for(spot);
    let stencil = spot_stencil(h);
    if stencil != Stencil::Central {
        debug!(?stencil, spot, level = barrier.level(), "one-sided spot bump");
    }
    d[Sensitivity::Spot] = first_difference(
        |s| price(option, s, cost_of_carry, rate, volatility),
        spot,
        h,
        base,
        stencil,
    )?;

    let strike = option.strike();
    let h = config.bump_for(strike);
    d[Sensitivity::Strike] = first_difference(
        |k| price(&option.with_strike(k)?, spot, cost_of_carry, rate, volatility),
        strike,
        h,
        base,
        Stencil::pick(true, strike - h > 0.0),
    )?;

    let h = config.bump_for(rate);
    d[Sensitivity::Rate] = first_difference(
        |r| price(option, spot, cost_of_carry, r, volatility),
        rate,
        h,
        base,
        Stencil::Central,
    )?;

    let h = config.bump_for(cost_of_carry);
    d[Sensitivity::CostOfCarry] = first_difference(
        |b| price(option, spot, b, rate, volatility),
        cost_of_carry,
        h,
        base,
        Stencil::Central,
    )?;

    let h = config.bump_for(volatility);
    d[Sensitivity::Volatility] = first_difference(
        |v| price(option, spot, cost_of_carry, rate, v),
        volatility,
        h,
        base,
        Stencil::pick(true, volatility - h >= 0.0),
    )?;

    let t = option.time_to_expiry();
    let h = config.bump_for(t);
    d[Sensitivity::Time] = first_difference(
        |t| price(&option.with_time_to_expiry(t)?, spot, cost_of_carry, rate, volatility),
        t,
        h,
        base,
        Stencil::pick(true, t - h >= 0.0),
    )?;

    let h = config.gamma_relative_bump * spot;
    d[Sensitivity::SpotSpot] = second_difference(
        |s| price(option, s, cost_of_carry, rate, volatility),
        spot,
        h,
        base,
        spot_stencil(h),
    )?;

    Ok(ValueDerivatives::new(base, d))
}
