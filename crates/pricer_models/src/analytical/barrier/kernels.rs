//! Reflection-principle building blocks of the barrier price.
//!
//! With `φ` the payoff sign, `η` the barrier sign, `H` the level and
//! `R` the rebate:
//!
//! ```text
//! A, B = φ·(S·df1·N(φ·x) - K·df2·N(φ·(x - σ√T)))                 x = x1, x2
//! C, D = φ·(S·df1·(H/S)^(2(μ+1))·N(η·y) - K·df2·(H/S)^(2μ)·N(η·(y - σ√T)))   y = y1, y2
//! E    = R·df2·(N(η·(x2 - σ√T)) - (H/S)^(2μ)·N(η·(y2 - σ√T)))
//! F    = R·((H/S)^(μ+λ)·N(η·z) + (H/S)^(μ-λ)·N(η·(z - 2λσ√T)))
//! ```
//!
//! A power factor whose CDF is exactly zero is never evaluated; it is taken
//! as zero so that a large exponent cannot turn the product into `0·∞`.

use pricer_core::math::NormalDistribution;

use crate::instruments::{Barrier, VanillaOption};

/// Shared intermediates of one general-path evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TermInputs {
    /// Spot `S`
    pub spot: f64,
    /// Strike `K`
    pub strike: f64,
    /// Barrier level `H`
    pub level: f64,
    /// Rebate `R`
    pub rebate: f64,
    /// Payoff sign `φ`
    pub phi: f64,
    /// Barrier sign `η`
    pub eta: f64,
    /// `e^((b-r)T)`
    pub df1: f64,
    /// `e^(-rT)`
    pub df2: f64,
    /// `σ√T`
    pub sigma_t: f64,
    /// `μ = (b - σ²/2) / σ²`
    pub mu: f64,
    /// `λ = sqrt(μ² + 2r/σ²)`, zero when the rebate-at-hit term is not needed
    pub lambda: f64,
}

/// Normalised log-moneyness variables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moneyness {
    /// `ln(S/K)/σ√T + m1`
    pub x1: f64,
    /// `ln(S/H)/σ√T + m1`
    pub x2: f64,
    /// `ln(H²/(S·K))/σ√T + m1`
    pub y1: f64,
    /// `ln(H/S)/σ√T + m1`
    pub y2: f64,
    /// `ln(H/S)/σ√T + λσ√T`
    pub z: f64,
}

impl TermInputs {
    /// Builds the intermediates for validated, non-degenerate inputs.
    ///
    /// `with_lambda` is set for knock-out contracts only; the square root
    /// may be NaN for strongly negative rates and the caller checks the
    /// final result.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        option: &VanillaOption,
        barrier: &Barrier,
        rebate: f64,
        spot: f64,
        cost_of_carry: f64,
        rate: f64,
        volatility: f64,
        with_lambda: bool,
    ) -> Self {
        let t = option.time_to_expiry();
        let variance = volatility * volatility;
        let mu = (cost_of_carry - 0.5 * variance) / variance;
        let lambda = if with_lambda {
            (mu * mu + 2.0 * rate / variance).sqrt()
        } else {
            0.0
        };
        Self {
            spot,
            strike: option.strike(),
            level: barrier.level(),
            rebate,
            phi: option.option_type().sign(),
            eta: barrier.direction().sign(),
            df1: ((cost_of_carry - rate) * t).exp(),
            df2: (-rate * t).exp(),
            sigma_t: volatility * t.sqrt(),
            mu,
            lambda,
        }
    }

    /// Drift offset `m1 = σ√T·(1 + μ)`.
    #[inline]
    pub fn m1(&self) -> f64 {
        self.sigma_t * (1.0 + self.mu)
    }

    /// `H / S`
    #[inline]
    pub fn ratio(&self) -> f64 {
        self.level / self.spot
    }

    /// Evaluates the five moneyness variables.
    pub fn moneyness(&self) -> Moneyness {
        let m1 = self.m1();
        let s = self.sigma_t;
        let log_spot_level = (self.spot / self.level).ln();
        Moneyness {
            x1: (self.spot / self.strike).ln() / s + m1,
            x2: log_spot_level / s + m1,
            y1: (self.level * self.level / (self.spot * self.strike)).ln() / s + m1,
            y2: -log_spot_level / s + m1,
            z: -log_spot_level / s + self.lambda * s,
        }
    }
}

/// `ratio^exponent`, or zero when the CDF it multiplies is exactly zero.
#[inline]
pub(crate) fn power_unless_zero(ratio: f64, exponent: f64, cdf: f64) -> f64 {
    if cdf == 0.0 {
        0.0
    } else {
        ratio.powf(exponent)
    }
}

/// `A(x1)` or `B(x2)`.
pub fn vanilla_term<N: NormalDistribution + ?Sized>(n: &N, p: &TermInputs, x: f64) -> f64 {
    let n1 = n.cdf(p.phi * x);
    let n2 = n.cdf(p.phi * (x - p.sigma_t));
    p.phi * (p.spot * p.df1 * n1 - p.strike * p.df2 * n2)
}

/// `C(y1)` or `D(y2)`.
pub fn reflected_term<N: NormalDistribution + ?Sized>(n: &N, p: &TermInputs, y: f64) -> f64 {
    let ratio = p.ratio();
    let n1 = n.cdf(p.eta * y);
    let n2 = n.cdf(p.eta * (y - p.sigma_t));
    let p1 = power_unless_zero(ratio, 2.0 * (p.mu + 1.0), n1);
    let p2 = power_unless_zero(ratio, 2.0 * p.mu, n2);
    p.phi * (p.spot * p.df1 * p1 * n1 - p.strike * p.df2 * p2 * n2)
}

/// `E(x2, y2)`: rebate paid at expiry when a knock-in never triggers.
pub fn rebate_at_expiry_term<N: NormalDistribution + ?Sized>(
    n: &N,
    p: &TermInputs,
    x2: f64,
    y2: f64,
) -> f64 {
    let n1 = n.cdf(p.eta * (x2 - p.sigma_t));
    let n2 = n.cdf(p.eta * (y2 - p.sigma_t));
    let power = power_unless_zero(p.ratio(), 2.0 * p.mu, n2);
    p.rebate * p.df2 * (n1 - power * n2)
}

/// `F(z)`: rebate paid when a knock-out barrier is touched.
pub fn rebate_at_hit_term<N: NormalDistribution + ?Sized>(n: &N, p: &TermInputs, z: f64) -> f64 {
    let ratio = p.ratio();
    let n1 = n.cdf(p.eta * z);
    let n2 = n.cdf(p.eta * (z - 2.0 * p.lambda * p.sigma_t));
    let p1 = power_unless_zero(ratio, p.mu + p.lambda, n1);
    let p2 = power_unless_zero(ratio, p.mu - p.lambda, n2);
    p.rebate * (p1 * n1 + p2 * n2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{Barrier, VanillaOption};
    use approx::assert_relative_eq;
    use pricer_core::math::StandardNormal;

    fn inputs(option: VanillaOption, barrier: Barrier) -> TermInputs {
        TermInputs::new(&option, &barrier, 3.0, 100.0, 0.03, 0.05, 0.25, true)
    }

    #[test]
    fn test_intermediates() {
        let p = inputs(
            VanillaOption::call(100.0, 1.0).unwrap(),
            Barrier::down_out(90.0).unwrap(),
        );
        let mu: f64 = (0.03 - 0.5 * 0.0625) / 0.0625;
        assert_relative_eq!(p.mu, mu, epsilon = 1e-15);
        assert_relative_eq!(p.lambda, (mu * mu + 0.1 / 0.0625).sqrt(), epsilon = 1e-15);
        assert_relative_eq!(p.sigma_t, 0.25, epsilon = 1e-15);
        assert_relative_eq!(p.df1, (-0.02_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(p.df2, (-0.05_f64).exp(), epsilon = 1e-15);
        assert_eq!(p.phi, 1.0);
        assert_eq!(p.eta, 1.0);
    }

    #[test]
    fn test_lambda_skipped_for_knock_in() {
        let option = VanillaOption::call(100.0, 1.0).unwrap();
        let barrier = Barrier::down_in(90.0).unwrap();
        let p = TermInputs::new(&option, &barrier, 0.0, 100.0, 0.03, 0.05, 0.25, false);
        assert_eq!(p.lambda, 0.0);
    }

    #[test]
    fn test_vanilla_term_is_black_scholes() {
        // A(x1) is the plain generalised Black-Scholes price.
        let option = VanillaOption::put(105.0, 2.0).unwrap();
        let p = inputs(option, Barrier::up_out(130.0).unwrap());
        let m = p.moneyness();
        let bs = crate::analytical::BlackScholes::new(100.0, 0.05, 0.03, 0.25).unwrap();
        assert_relative_eq!(
            vanilla_term(&StandardNormal, &p, m.x1),
            bs.price(&option),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_barrier_at_spot_collapses_moneyness() {
        // With H == S the x2/y2 pair and the reflected terms coincide.
        let option = VanillaOption::call(95.0, 1.0).unwrap();
        let barrier = Barrier::down_out(100.0).unwrap();
        let p = inputs(option, barrier);
        let m = p.moneyness();
        assert_relative_eq!(m.x2, m.y2, epsilon = 1e-15);
        assert_relative_eq!(m.x1, m.y1, epsilon = 1e-14);
        let n = StandardNormal;
        assert_relative_eq!(
            vanilla_term(&n, &p, m.x1),
            reflected_term(&n, &p, m.y1),
            epsilon = 1e-12
        );
        // E vanishes: never-touched probability is zero at the barrier.
        assert_relative_eq!(rebate_at_expiry_term(&n, &p, m.x2, m.y2), 0.0, epsilon = 1e-12);
        // F pays the full rebate immediately.
        assert_relative_eq!(rebate_at_hit_term(&n, &p, m.z), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_power_short_circuit() {
        assert_eq!(power_unless_zero(1e-30, 500.0, 0.0), 0.0);
        assert_eq!(power_unless_zero(1e30, 500.0, 0.0), 0.0);
        assert_relative_eq!(power_unless_zero(2.0, 3.0, 0.5), 8.0);
    }

    #[test]
    fn test_reflected_term_far_barrier_is_finite() {
        // μ ≈ 2000 and H/S = 1e5: the power factors overflow to infinity.
        let option = VanillaOption::call(100.0, 0.01).unwrap();
        let barrier = Barrier::up_in(1e7).unwrap();
        let p = TermInputs::new(&option, &barrier, 1.0, 100.0, 5.0, 0.0, 0.05, false);
        assert!(p.ratio().powf(2.0 * (p.mu + 1.0)).is_infinite());

        let m = p.moneyness();
        let n = StandardNormal;
        assert_eq!(reflected_term(&n, &p, m.y1), 0.0);
        assert_eq!(reflected_term(&n, &p, m.y2), 0.0);
        assert!(rebate_at_expiry_term(&n, &p, m.x2, m.y2).is_finite());
    }
}
