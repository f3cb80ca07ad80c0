//! Black-model single-barrier pricer.
//!
//! [`BlackBarrierPricer`] is stateless: it holds a normal-distribution
//! provider and a [`BarrierEngineConfig`], both read-only, so one instance
//! can be shared by any number of threads without locking.

use pricer_core::math::{close_equals, NormalDistribution, StandardNormal};
use pricer_core::types::{PricingError, PricingResult};
use tracing::{debug, trace, warn};

use super::adjoint::{self, TermDerivatives};
use super::config::BarrierEngineConfig;
use super::degenerate::degenerate_value;
use super::dispatch::{DispatchKey, RebateTerm, TermCombination};
use super::kernels::{self, Moneyness, TermInputs};
use super::sensitivities::{DerivativeVector, Sensitivity, ValueDerivatives};
use crate::instruments::{Barrier, BarrierDirection, VanillaOption};

/// Closed-form pricer for continuously monitored single barriers.
///
/// Prices are present values in the units of `spot`. Rates are
/// continuously compounded; `cost_of_carry` is the forward drift
/// (`r - q` for a dividend yield `q`).
///
/// # Examples
/// ```
/// use pricer_models::analytical::barrier::BlackBarrierPricer;
/// use pricer_models::instruments::{Barrier, VanillaOption};
///
/// let pricer = BlackBarrierPricer::new();
/// let option = VanillaOption::call(100.0, 1.0).unwrap();
/// let down_in = Barrier::down_in(90.0).unwrap();
/// let down_out = Barrier::down_out(90.0).unwrap();
///
/// let pv_in = pricer.price(&option, &down_in, 0.0, 105.0, 0.03, 0.05, 0.2).unwrap();
/// let pv_out = pricer.price(&option, &down_out, 0.0, 105.0, 0.03, 0.05, 0.2).unwrap();
///
/// let greeks = pricer
///     .price_with_derivatives(&option, &down_out, 0.0, 105.0, 0.03, 0.05, 0.2)
///     .unwrap();
/// assert!((greeks.value - pv_out).abs() < 1e-14);
/// assert!(pv_in > 0.0);
///
/// // Spot below a down barrier is rejected.
/// assert!(pricer.price(&option, &down_in, 0.0, 85.0, 0.03, 0.05, 0.2).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlackBarrierPricer<N: NormalDistribution = StandardNormal> {
    distribution: N,
    config: BarrierEngineConfig,
}

impl BlackBarrierPricer {
    /// Pricer with the default provider and configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pricer with the default provider and a custom configuration.
    pub fn with_config(config: BarrierEngineConfig) -> PricingResult<Self> {
        Self::with_distribution(StandardNormal, config)
    }
}

impl<N: NormalDistribution> BlackBarrierPricer<N> {
    /// Pricer evaluating `Φ` and `φ` through `distribution`.
    ///
    /// # Errors
    /// `PricingError::ConfigError` if `config` does not validate.
    pub fn with_distribution(distribution: N, config: BarrierEngineConfig) -> PricingResult<Self> {
        config.validate()?;
        Ok(Self {
            distribution,
            config,
        })
    }

    /// Returns the engine configuration.
    #[inline]
    pub fn config(&self) -> &BarrierEngineConfig {
        &self.config
    }

    /// Returns the normal-distribution provider.
    #[inline]
    pub fn distribution(&self) -> &N {
        &self.distribution
    }

    /// `true` when volatility or expiry is within the zero tolerance.
    #[inline]
    pub fn is_degenerate(&self, option: &VanillaOption, volatility: f64) -> bool {
        let tol = self.config.zero_tolerance;
        close_equals(volatility, 0.0, tol) || close_equals(option.time_to_expiry(), 0.0, tol)
    }

    /// Present value of a barrier option.
    ///
    /// # Arguments
    /// * `option` - Underlying vanilla contract
    /// * `barrier` - Knock type, direction and level
    /// * `rebate` - Paid at expiry if a knock-in never triggers, or on hit for a knock-out
    /// * `spot` - Current underlying price
    /// * `cost_of_carry` - Forward drift `b`
    /// * `rate` - Discount rate `r`
    /// * `volatility` - Lognormal volatility `σ`
    ///
    /// # Errors
    /// - `PricingError::InvalidArgument` if the barrier is already breached
    ///   or any market input is out of domain
    /// - `PricingError::NumericalInstability` if the result is not finite
    #[allow(clippy::too_many_arguments)]
    pub fn price(
        &self,
        option: &VanillaOption,
        barrier: &Barrier,
        rebate: f64,
        spot: f64,
        cost_of_carry: f64,
        rate: f64,
        volatility: f64,
    ) -> PricingResult<f64> {
        validate_inputs(barrier, rebate, spot, cost_of_carry, rate, volatility)?;

        if self.is_degenerate(option, volatility) {
            let limit = degenerate_value(option, barrier, rebate, spot, cost_of_carry, rate);
            return ensure_finite(limit.value, "price");
        }

        let (combination, p) =
            self.setup(option, barrier, rebate, spot, cost_of_carry, rate, volatility);
        let m = p.moneyness();
        let n = &self.distribution;
        let [wa, wb, wc, wd] = combination.weights();

        let mut value = 0.0;
        if wa != 0.0 {
            value += wa * kernels::vanilla_term(n, &p, m.x1);
        }
        if wb != 0.0 {
            value += wb * kernels::vanilla_term(n, &p, m.x2);
        }
        if wc != 0.0 {
            value += wc * kernels::reflected_term(n, &p, m.y1);
        }
        if wd != 0.0 {
            value += wd * kernels::reflected_term(n, &p, m.y2);
        }
        if rebate != 0.0 {
            let term = match combination.rebate_term {
                RebateTerm::AtExpiry => kernels::rebate_at_expiry_term(n, &p, m.x2, m.y2),
                RebateTerm::AtHit => kernels::rebate_at_hit_term(n, &p, m.z),
            };
            value += f64::from(combination.rebate) * term;
        }

        trace!(value, "barrier price");
        ensure_finite(value, "price")
    }

    /// Present value together with its seven sensitivities.
    ///
    /// Slots are `[spot, strike, rate, costOfCarry, volatility, time, spot²]`.
    /// On the deterministic branch the derivatives are the exact
    /// sub-gradient of the intrinsic or rebate value that applies.
    ///
    /// # Errors
    /// Same as [`price`](Self::price); a non-finite derivative is also
    /// reported as `PricingError::NumericalInstability`.
    #[allow(clippy::too_many_arguments)]
    pub fn price_with_derivatives(
        &self,
        option: &VanillaOption,
        barrier: &Barrier,
        rebate: f64,
        spot: f64,
        cost_of_carry: f64,
        rate: f64,
        volatility: f64,
    ) -> PricingResult<ValueDerivatives> {
        validate_inputs(barrier, rebate, spot, cost_of_carry, rate, volatility)?;

        let result = if self.is_degenerate(option, volatility) {
            degenerate_value(option, barrier, rebate, spot, cost_of_carry, rate)
        } else {
            let (combination, p) =
                self.setup(option, barrier, rebate, spot, cost_of_carry, rate, volatility);
            let m = p.moneyness();
            let adjoints = self.sweep(&combination, &p, &m);
            let derivatives = chain_rule(
                &p,
                &adjoints,
                option.time_to_expiry(),
                cost_of_carry,
                rate,
                volatility,
            );
            ValueDerivatives::new(adjoints.value, derivatives)
        };

        ensure_finite(result.value, "price")?;
        if !result.derivatives.is_finite() {
            return Err(PricingError::NumericalInstability(format!(
                "non-finite derivatives {:?}",
                result.derivatives.as_array()
            )));
        }
        Ok(result)
    }

    #[allow(clippy::too_many_arguments)]
    fn setup(
        &self,
        option: &VanillaOption,
        barrier: &Barrier,
        rebate: f64,
        spot: f64,
        cost_of_carry: f64,
        rate: f64,
        volatility: f64,
    ) -> (TermCombination, TermInputs) {
        let key = DispatchKey::for_contract(option, barrier);
        let combination = key.combination();
        debug!(key = %key, combination = %combination, "barrier dispatch");

        let with_lambda = combination.rebate_term == RebateTerm::AtHit && rebate != 0.0;
        let inputs = TermInputs::new(
            option,
            barrier,
            rebate,
            spot,
            cost_of_carry,
            rate,
            volatility,
            with_lambda,
        );
        trace!(
            df1 = inputs.df1,
            df2 = inputs.df2,
            sigma_t = inputs.sigma_t,
            mu = inputs.mu,
            lambda = inputs.lambda,
            "barrier intermediates"
        );
        (combination, inputs)
    }

    /// Replays the combination over the kernel adjoints.
    fn sweep(&self, combination: &TermCombination, p: &TermInputs, m: &Moneyness) -> Adjoints {
        let n = &self.distribution;
        let [wa, wb, wc, wd] = combination.weights();
        let mut acc = Adjoints::default();

        if wa != 0.0 {
            let d = adjoint::vanilla_term(n, p, m.x1);
            acc.add(wa, &d);
            acc.x1 += wa * d.x;
        }
        if wb != 0.0 {
            let d = adjoint::vanilla_term(n, p, m.x2);
            acc.add(wb, &d);
            acc.x2 += wb * d.x;
        }
        if wc != 0.0 {
            let d = adjoint::reflected_term(n, p, m.y1);
            acc.add(wc, &d);
            acc.y1 += wc * d.y;
        }
        if wd != 0.0 {
            let d = adjoint::reflected_term(n, p, m.y2);
            acc.add(wd, &d);
            acc.y2 += wd * d.y;
        }
        if p.rebate != 0.0 {
            let w = f64::from(combination.rebate);
            match combination.rebate_term {
                RebateTerm::AtExpiry => {
                    let d = adjoint::rebate_at_expiry_term(n, p, m.x2, m.y2);
                    acc.add(w, &d);
                    acc.x2 += w * d.x;
                    acc.y2 += w * d.y;
                }
                RebateTerm::AtHit => {
                    let d = adjoint::rebate_at_hit_term(n, p, m.z);
                    acc.add(w, &d);
                    acc.z += w * d.z;
                }
            }
        }

        trace!(value = acc.value, gamma = acc.spot_spot, "barrier adjoint sweep");
        acc
    }
}

/// Adjoints of the shared intermediates, summed over the combination.
#[derive(Debug, Default)]
struct Adjoints {
    value: f64,
    spot: f64,
    strike: f64,
    df1: f64,
    df2: f64,
    sigma_t: f64,
    mu: f64,
    lambda: f64,
    spot_spot: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
    z: f64,
}

impl Adjoints {
    fn add(&mut self, weight: f64, d: &TermDerivatives) {
        self.value += weight * d.value;
        self.spot += weight * d.spot;
        self.strike += weight * d.strike;
        self.df1 += weight * d.df1;
        self.df2 += weight * d.df2;
        self.sigma_t += weight * d.sigma_t;
        self.mu += weight * d.mu;
        self.lambda += weight * d.lambda;
        self.spot_spot += weight * d.spot_spot;
    }
}

/// Maps the intermediate adjoints onto the caller-facing inputs.
///
/// ```text
/// x1 = ln(S/K)/σ√T + m1      y1 = ln(H²/SK)/σ√T + m1      m1 = σ√T(1 + μ)
/// x2 = ln(S/H)/σ√T + m1      y2 = ln(H/S)/σ√T + m1        z  = ln(H/S)/σ√T + λσ√T
/// μ = b/σ² - 1/2             λ = sqrt(μ² + 2r/σ²)
/// df1 = e^((b-r)T)           df2 = e^(-rT)
/// ```
fn chain_rule(
    p: &TermInputs,
    a: &Adjoints,
    t: f64,
    cost_of_carry: f64,
    rate: f64,
    volatility: f64,
) -> DerivativeVector {
    let s_t = p.sigma_t;
    let variance = volatility * volatility;
    let log_spot_strike = (p.spot / p.strike).ln();
    let log_spot_level = (p.spot / p.level).ln();
    let log_reflected = (p.level * p.level / (p.spot * p.strike)).ln();

    // Moneyness -> σ√T, μ, λ
    let m1_bar = a.x1 + a.x2 + a.y1 + a.y2;
    let log_weighted = a.x1 * log_spot_strike + a.x2 * log_spot_level + a.y1 * log_reflected
        - (a.y2 + a.z) * log_spot_level;
    let sigma_t_bar = a.sigma_t - log_weighted / (s_t * s_t)
        + a.z * p.lambda
        + m1_bar * (1.0 + p.mu);
    let mut mu_bar = a.mu + m1_bar * s_t;
    let lambda_bar = a.lambda + a.z * s_t;

    let mut rate_bar = -t * (a.df1 * p.df1 + a.df2 * p.df2);
    let mut vol_bar = 0.0;

    // λ only enters through the rebate-at-hit term; its derivative is singular at zero.
    if p.lambda > 0.0 {
        mu_bar += lambda_bar * p.mu / p.lambda;
        rate_bar += lambda_bar / (p.lambda * variance);
        vol_bar -= lambda_bar * 2.0 * rate / (p.lambda * variance * volatility);
    }

    let carry_bar = mu_bar / variance + a.df1 * t * p.df1;
    vol_bar += sigma_t_bar * t.sqrt() - mu_bar * 2.0 * cost_of_carry / (variance * volatility);
    let time_bar = sigma_t_bar * volatility / (2.0 * t.sqrt())
        + a.df1 * (cost_of_carry - rate) * p.df1
        - a.df2 * rate * p.df2;

    let per_log = 1.0 / s_t;
    let mut d = DerivativeVector::zeros();
    d[Sensitivity::Spot] = a.spot + (a.x1 + a.x2 - a.y1 - a.y2 - a.z) * per_log / p.spot;
    d[Sensitivity::Strike] = a.strike - (a.x1 + a.y1) * per_log / p.strike;
    d[Sensitivity::Rate] = rate_bar;
    d[Sensitivity::CostOfCarry] = carry_bar;
    d[Sensitivity::Volatility] = vol_bar;
    d[Sensitivity::Time] = time_bar;
    d[Sensitivity::SpotSpot] = a.spot_spot;
    d
}

fn validate_inputs(
    barrier: &Barrier,
    rebate: f64,
    spot: f64,
    cost_of_carry: f64,
    rate: f64,
    volatility: f64,
) -> PricingResult<()> {
    let reject = |message: String| {
        warn!(%message, "rejected barrier pricing request");
        Err(PricingError::InvalidArgument(message))
    };

    if !spot.is_finite() || spot <= 0.0 {
        return reject(format!("spot must be positive and finite, got {}", spot));
    }
    if !volatility.is_finite() || volatility < 0.0 {
        return reject(format!(
            "volatility must be non-negative and finite, got {}",
            volatility
        ));
    }
    if !rate.is_finite() || !cost_of_carry.is_finite() || !rebate.is_finite() {
        return reject(format!(
            "rate, cost of carry and rebate must be finite, got {}, {}, {}",
            rate, cost_of_carry, rebate
        ));
    }
    if barrier.is_breached_by(spot) {
        let side = match barrier.direction() {
            BarrierDirection::Down => "below",
            BarrierDirection::Up => "above",
        };
        return reject(format!(
            "barrier already breached: spot {} is {} the {:?} barrier at {}",
            spot,
            side,
            barrier.direction(),
            barrier.level()
        ));
    }
    Ok(())
}

fn ensure_finite(value: f64, what: &str) -> PricingResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::NumericalInstability(format!(
            "non-finite {}: {}",
            what, value
        )))
    }
}
