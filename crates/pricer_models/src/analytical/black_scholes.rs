//! Generalised Black-Scholes pricing for European options.
//!
//! Cost-of-carry form of the Black-Scholes model, used as the vanilla
//! reference for barrier in-out parity and as the limit of the barrier
//! engine when the barrier can never be reached.
//!
//! ## Mathematical Formulas
//!
//! **Price**: V = φ·(S·e^((b-r)T)·N(φ·d₁) - K·e^(-rT)·N(φ·d₂))
//!
//! Where:
//! - φ = +1 for a call, -1 for a put
//! - b is the cost of carry (r - q for a dividend yield q)
//! - d₁ = (ln(S/K) + (b + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! Rate and cost of carry are independent inputs, so `rho` is the
//! sensitivity to discounting with the forward held fixed.

use pricer_core::math::{norm_cdf, norm_pdf};
use pricer_core::types::{PricingError, PricingResult};

use crate::instruments::VanillaOption;

/// Volatility or expiry at or below this is priced at its deterministic limit.
const DEGENERATE_TOLERANCE: f64 = 1e-16;

/// Generalised Black-Scholes model.
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
/// use pricer_models::instruments::VanillaOption;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.05, 0.2).unwrap();
/// let call = VanillaOption::call(100.0, 1.0).unwrap();
/// let put = VanillaOption::put(100.0, 1.0).unwrap();
///
/// // Put-call parity: C - P = S·e^((b-r)T) - K·e^(-rT)
/// let parity = bs.price(&call) - bs.price(&put) - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    /// Spot price (S)
    spot: f64,
    /// Risk-free interest rate (r)
    rate: f64,
    /// Cost of carry (b)
    cost_of_carry: f64,
    /// Volatility (σ)
    volatility: f64,
}

/// Shared intermediates of one evaluation.
struct Terms {
    phi: f64,
    t: f64,
    sqrt_t: f64,
    df1: f64,
    df2: f64,
    d1: f64,
    d2: f64,
}

impl BlackScholes {
    /// Creates a new model.
    ///
    /// # Arguments
    /// * `spot` - Current spot price (must be positive)
    /// * `rate` - Continuously compounded discount rate
    /// * `cost_of_carry` - Continuously compounded forward drift
    /// * `volatility` - Lognormal volatility (must be non-negative)
    ///
    /// # Errors
    /// `PricingError::InvalidArgument` for a non-positive spot, a negative
    /// volatility or any non-finite input.
    pub fn new(spot: f64, rate: f64, cost_of_carry: f64, volatility: f64) -> PricingResult<Self> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidArgument(format!(
                "spot must be positive and finite, got {}",
                spot
            )));
        }
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(PricingError::InvalidArgument(format!(
                "volatility must be non-negative and finite, got {}",
                volatility
            )));
        }
        if !rate.is_finite() || !cost_of_carry.is_finite() {
            return Err(PricingError::invalid_argument(
                "rate and cost of carry must be finite",
            ));
        }
        Ok(Self {
            spot,
            rate,
            cost_of_carry,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the cost of carry.
    #[inline]
    pub fn cost_of_carry(&self) -> f64 {
        self.cost_of_carry
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    fn is_degenerate(&self, t: f64) -> bool {
        self.volatility <= DEGENERATE_TOLERANCE || t <= DEGENERATE_TOLERANCE
    }

    fn terms(&self, option: &VanillaOption) -> Terms {
        let t = option.time_to_expiry();
        let sqrt_t = t.sqrt();
        let vol_sqrt_t = self.volatility * sqrt_t;
        let d1 = if self.is_degenerate(t) {
            0.0
        } else {
            ((self.spot / option.strike()).ln()
                + (self.cost_of_carry + 0.5 * self.volatility * self.volatility) * t)
                / vol_sqrt_t
        };
        Terms {
            phi: option.option_type().sign(),
            t,
            sqrt_t,
            df1: ((self.cost_of_carry - self.rate) * t).exp(),
            df2: (-self.rate * t).exp(),
            d1,
            d2: d1 - vol_sqrt_t,
        }
    }

    /// `true` when the deterministic limit is in the money.
    fn limit_in_the_money(&self, option: &VanillaOption, terms: &Terms) -> bool {
        terms.phi * (self.spot * terms.df1 - option.strike() * terms.df2) > 0.0
    }

    /// Computes the option price.
    ///
    /// With zero volatility or zero time the price is the discounted
    /// forward intrinsic value `max(φ·(S·e^((b-r)T) - K·e^(-rT)), 0)`.
    pub fn price(&self, option: &VanillaOption) -> f64 {
        let k = option.strike();
        let s = self.terms(option);

        if self.is_degenerate(s.t) {
            return (s.phi * (self.spot * s.df1 - k * s.df2)).max(0.0);
        }

        s.phi
            * (self.spot * s.df1 * norm_cdf(s.phi * s.d1) - k * s.df2 * norm_cdf(s.phi * s.d2))
    }

    /// Computes Delta (∂V/∂S).
    pub fn delta(&self, option: &VanillaOption) -> f64 {
        let s = self.terms(option);
        if self.is_degenerate(s.t) {
            return if self.limit_in_the_money(option, &s) {
                s.phi * s.df1
            } else {
                0.0
            };
        }
        s.phi * s.df1 * norm_cdf(s.phi * s.d1)
    }

    /// Computes Gamma (∂²V/∂S²).
    ///
    /// Gamma = e^((b-r)T)·φ(d₁) / (S·σ·√T), identical for calls and puts.
    pub fn gamma(&self, option: &VanillaOption) -> f64 {
        let s = self.terms(option);
        if self.is_degenerate(s.t) {
            return 0.0;
        }
        s.df1 * norm_pdf(s.d1) / (self.spot * self.volatility * s.sqrt_t)
    }

    /// Computes Vega (∂V/∂σ).
    pub fn vega(&self, option: &VanillaOption) -> f64 {
        let s = self.terms(option);
        if self.is_degenerate(s.t) {
            return 0.0;
        }
        self.spot * s.df1 * norm_pdf(s.d1) * s.sqrt_t
    }

    /// Computes Rho (∂V/∂r) with the cost of carry held fixed.
    ///
    /// Both discount factors carry `e^(-rT)`, so Rho = -T·V.
    pub fn rho(&self, option: &VanillaOption) -> f64 {
        -option.time_to_expiry() * self.price(option)
    }

    /// Computes the carry sensitivity (∂V/∂b).
    pub fn carry_rho(&self, option: &VanillaOption) -> f64 {
        let s = self.terms(option);
        if self.is_degenerate(s.t) {
            return if self.limit_in_the_money(option, &s) {
                s.phi * self.spot * s.t * s.df1
            } else {
                0.0
            };
        }
        s.phi * self.spot * s.t * s.df1 * norm_cdf(s.phi * s.d1)
    }

    /// Computes the sensitivity to time to expiry (∂V/∂T).
    ///
    /// This is the derivative with respect to the expiry argument, so it is
    /// the negative of the calendar theta.
    pub fn time_sensitivity(&self, option: &VanillaOption) -> f64 {
        let k = option.strike();
        let s = self.terms(option);
        let b_minus_r = self.cost_of_carry - self.rate;

        if self.is_degenerate(s.t) {
            return if self.limit_in_the_money(option, &s) {
                s.phi * (self.spot * s.df1 * b_minus_r + k * s.df2 * self.rate)
            } else {
                0.0
            };
        }

        let diffusion = self.spot * s.df1 * norm_pdf(s.d1) * self.volatility / (2.0 * s.sqrt_t);
        diffusion
            + s.phi * b_minus_r * self.spot * s.df1 * norm_cdf(s.phi * s.d1)
            + s.phi * self.rate * k * s.df2 * norm_cdf(s.phi * s.d2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> BlackScholes {
        BlackScholes::new(100.0, 0.05, 0.03, 0.25).unwrap()
    }

    // ==========================================================
    // Constructor Tests
    // ==========================================================

    #[test]
    fn test_new_valid_parameters() {
        let bs = BlackScholes::new(100.0, 0.05, 0.03, 0.2).unwrap();
        assert_eq!(bs.spot(), 100.0);
        assert_eq!(bs.rate(), 0.05);
        assert_eq!(bs.cost_of_carry(), 0.03);
        assert_eq!(bs.volatility(), 0.2);
    }

    #[test]
    fn test_new_invalid_inputs() {
        assert!(BlackScholes::new(-100.0, 0.05, 0.05, 0.2).is_err());
        assert!(BlackScholes::new(0.0, 0.05, 0.05, 0.2).is_err());
        assert!(BlackScholes::new(100.0, 0.05, 0.05, -0.2).is_err());
        assert!(BlackScholes::new(100.0, f64::NAN, 0.05, 0.2).is_err());
    }

    #[test]
    fn test_zero_volatility_allowed() {
        assert!(BlackScholes::new(100.0, 0.05, 0.05, 0.0).is_ok());
    }

    // ==========================================================
    // Price Tests
    // ==========================================================

    #[test]
    fn test_call_price_reference_value() {
        // S=100, K=100, r=b=0.05, σ=0.2, T=1
        let bs = BlackScholes::new(100.0, 0.05, 0.05, 0.2).unwrap();
        let call = VanillaOption::call(100.0, 1.0).unwrap();
        assert_relative_eq!(bs.price(&call), 10.450583572185565, epsilon = 1e-12);
    }

    #[test]
    fn test_put_price_reference_value() {
        let bs = BlackScholes::new(100.0, 0.05, 0.05, 0.2).unwrap();
        let put = VanillaOption::put(100.0, 1.0).unwrap();
        assert_relative_eq!(bs.price(&put), 5.573526022256971, epsilon = 1e-12);
    }

    #[test]
    fn test_put_call_parity_with_carry() {
        let bs = model();
        for strike in [80.0, 100.0, 125.0] {
            let call = VanillaOption::call(strike, 2.0).unwrap();
            let put = VanillaOption::put(strike, 2.0).unwrap();
            let forward_value = 100.0 * (-0.02_f64 * 2.0).exp() - strike * (-0.1_f64).exp();
            assert_relative_eq!(
                bs.price(&call) - bs.price(&put),
                forward_value,
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_expiry_zero_is_intrinsic() {
        let bs = BlackScholes::new(110.0, 0.05, 0.0, 0.2).unwrap();
        assert_relative_eq!(bs.price(&VanillaOption::call(100.0, 0.0).unwrap()), 10.0);
        assert_eq!(bs.price(&VanillaOption::put(100.0, 0.0).unwrap()), 0.0);
    }

    #[test]
    fn test_zero_volatility_is_discounted_forward_intrinsic() {
        let bs = BlackScholes::new(100.0, 0.05, 0.03, 0.0).unwrap();
        let call = VanillaOption::call(95.0, 1.0).unwrap();
        let expected = 100.0 * (-0.02_f64).exp() - 95.0 * (-0.05_f64).exp();
        assert_relative_eq!(bs.price(&call), expected, epsilon = 1e-12);
        assert_relative_eq!(bs.delta(&call), (-0.02_f64).exp(), epsilon = 1e-12);
        assert_eq!(bs.gamma(&call), 0.0);
        assert_eq!(bs.vega(&call), 0.0);
    }

    // ==========================================================
    // Greeks vs bump-and-revalue
    // ==========================================================

    fn central(f: impl Fn(f64) -> f64, x: f64, h: f64) -> f64 {
        (f(x + h) - f(x - h)) / (2.0 * h)
    }

    #[test]
    fn test_greeks_match_finite_differences() {
        for option in [
            VanillaOption::call(90.0, 1.5).unwrap(),
            VanillaOption::put(90.0, 1.5).unwrap(),
            VanillaOption::call(115.0, 0.5).unwrap(),
            VanillaOption::put(115.0, 0.5).unwrap(),
        ] {
            let bs = model();
            let at = |s: f64, r: f64, b: f64, v: f64| BlackScholes::new(s, r, b, v).unwrap();

            let delta = central(|s| at(s, 0.05, 0.03, 0.25).price(&option), 100.0, 1e-3);
            assert_relative_eq!(bs.delta(&option), delta, max_relative = 1e-6);

            let gamma = central(|s| at(s, 0.05, 0.03, 0.25).delta(&option), 100.0, 1e-3);
            assert_relative_eq!(bs.gamma(&option), gamma, max_relative = 1e-6);

            let vega = central(|v| at(100.0, 0.05, 0.03, v).price(&option), 0.25, 1e-6);
            assert_relative_eq!(bs.vega(&option), vega, max_relative = 1e-6);

            let rho = central(|r| at(100.0, r, 0.03, 0.25).price(&option), 0.05, 1e-6);
            assert_relative_eq!(bs.rho(&option), rho, max_relative = 1e-6);

            let carry = central(|b| at(100.0, 0.05, b, 0.25).price(&option), 0.03, 1e-6);
            assert_relative_eq!(bs.carry_rho(&option), carry, max_relative = 1e-6);

            let t0 = option.time_to_expiry();
            let time = central(
                |t| bs.price(&option.with_time_to_expiry(t).unwrap()),
                t0,
                1e-6,
            );
            assert_relative_eq!(bs.time_sensitivity(&option), time, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_gamma_and_vega_same_for_call_and_put() {
        let bs = model();
        let call = VanillaOption::call(105.0, 1.0).unwrap();
        let put = VanillaOption::put(105.0, 1.0).unwrap();
        assert_relative_eq!(bs.gamma(&call), bs.gamma(&put), epsilon = 1e-15);
        assert_relative_eq!(bs.vega(&call), bs.vega(&put), epsilon = 1e-12);
    }
}
