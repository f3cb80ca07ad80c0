//! Barrier engine configuration.
//!
//! Provides [`BarrierEngineConfig`], the only state a
//! [`BlackBarrierPricer`](super::BlackBarrierPricer) carries besides its
//! normal-distribution provider.

use pricer_core::types::{PricingError, PricingResult};

/// Default absolute tolerance for treating volatility or expiry as zero.
pub const DEFAULT_ZERO_TOLERANCE: f64 = 1e-16;

/// Configuration for the barrier engines.
///
/// # Default Values
///
/// | Parameter | Default | Description |
/// |-----------|---------|-------------|
/// | `zero_tolerance` | 1e-16 | Volatility / expiry at or below this take the deterministic branch |
///
/// # Examples
///
/// ```rust
/// use pricer_models::analytical::barrier::BarrierEngineConfig;
///
/// let config = BarrierEngineConfig::builder()
///     .zero_tolerance(1e-12)
///     .build()
///     .unwrap();
/// assert_eq!(config.zero_tolerance, 1e-12);
///
/// assert!(BarrierEngineConfig::builder().zero_tolerance(-1.0).build().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierEngineConfig {
    /// Absolute tolerance for the degenerate volatility / expiry test (default: 1e-16).
    pub zero_tolerance: f64,
}

impl Default for BarrierEngineConfig {
    fn default() -> Self {
        Self {
            zero_tolerance: DEFAULT_ZERO_TOLERANCE,
        }
    }
}

impl BarrierEngineConfig {
    /// Creates a new builder for constructing a `BarrierEngineConfig`.
    pub fn builder() -> BarrierEngineConfigBuilder {
        BarrierEngineConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> PricingResult<()> {
        if !self.zero_tolerance.is_finite() || self.zero_tolerance < 0.0 {
            return Err(PricingError::ConfigError(format!(
                "zero_tolerance must be finite and >= 0, got {}",
                self.zero_tolerance
            )));
        }
        if self.zero_tolerance > 1e-4 {
            return Err(PricingError::ConfigError(
                "zero_tolerance must be <= 1e-4".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`BarrierEngineConfig`].
#[derive(Debug, Default)]
pub struct BarrierEngineConfigBuilder {
    zero_tolerance: Option<f64>,
}

impl BarrierEngineConfigBuilder {
    /// Sets the zero tolerance (default: 1e-16).
    pub fn zero_tolerance(mut self, tolerance: f64) -> Self {
        self.zero_tolerance = Some(tolerance);
        self
    }

    /// Builds the configuration, validating all parameters.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::ConfigError` if any parameter is invalid.
    pub fn build(self) -> PricingResult<BarrierEngineConfig> {
        let config = BarrierEngineConfig {
            zero_tolerance: self.zero_tolerance.unwrap_or(DEFAULT_ZERO_TOLERANCE),
        };
        config.validate()?;
        Ok(config)
    }
}
