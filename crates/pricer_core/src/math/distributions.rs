//! Standard normal distribution functions.
//!
//! This module provides:
//! - [`NormalDistribution`]: the provider seam the pricing engines evaluate
//!   every `Φ(x)` / `φ(x)` through
//! - [`StandardNormal`]: the default provider
//! - `norm_cdf` / `norm_pdf`: free functions delegating to [`StandardNormal`]
//!
//! The engines assume the provider is side-effect free; the `Send + Sync`
//! bound lets a single engine instance be shared across threads.

use statrs::function::erf::erfc;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Cumulative distribution and density of the standard normal law.
///
/// # Examples
/// ```
/// use pricer_core::math::distributions::{NormalDistribution, StandardNormal};
///
/// fn median<N: NormalDistribution>(n: &N) -> f64 {
///     n.cdf(0.0)
/// }
///
/// assert!((median(&StandardNormal) - 0.5).abs() < 1e-15);
/// ```
pub trait NormalDistribution: Send + Sync {
    /// Φ(x) = P(X <= x) for X ~ N(0, 1).
    fn cdf(&self, x: f64) -> f64;

    /// φ(x) = exp(-x² / 2) / sqrt(2π).
    fn pdf(&self, x: f64) -> f64;
}

/// Default provider backed by the complementary error function.
///
/// # Mathematical Definition
/// Φ(x) = (1/2) * erfc(-x / sqrt(2))
///
/// `statrs`' `erfc` is accurate to about `1e-11` absolute near `|x| ≈ 1`,
/// not to full double precision. It keeps a small relative error in the
/// left tail and underflows to exactly `0.0` far enough out, which the
/// barrier kernels rely on to skip their reflection power factors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardNormal;

impl NormalDistribution for StandardNormal {
    #[inline]
    fn cdf(&self, x: f64) -> f64 {
        0.5 * erfc(-x / std::f64::consts::SQRT_2)
    }

    #[inline]
    fn pdf(&self, x: f64) -> f64 {
        FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
    }
}

/// Standard normal cumulative distribution function.
///
/// # Examples
/// ```
/// use pricer_core::math::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
/// assert!(norm_cdf(-3.0) < 0.01);
/// assert!(norm_cdf(3.0) > 0.99);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    StandardNormal.cdf(x)
}

/// Standard normal probability density function.
///
/// # Examples
/// ```
/// use pricer_core::math::distributions::norm_pdf;
///
/// // φ(0) = 1 / sqrt(2π) ≈ 0.3989
/// assert!((norm_pdf(0.0) - 0.3989422804).abs() < 1e-10);
/// ```
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    StandardNormal.pdf(x)
}
