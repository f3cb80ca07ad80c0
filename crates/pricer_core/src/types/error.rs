//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from pricing operations
//! - `PricingResult`: Result alias used by every engine entry point

use thiserror::Error;

/// Categorised pricing errors.
///
/// Every engine entry point validates its inputs before any floating-point
/// work and fails fast with one of these variants; there is never a partial
/// or best-effort price.
///
/// # Variants
/// - `InvalidArgument`: Invalid contract or market input (including an
///   already-breached barrier)
/// - `NumericalInstability`: The closed form produced a non-finite value
/// - `ConfigError`: Engine configuration out of range
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidArgument("Negative spot price".to_string());
/// assert_eq!(format!("{}", err), "Invalid argument: Negative spot price");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PricingError {
    /// Invalid input data or parameters.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl PricingError {
    /// Shorthand for [`PricingError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        PricingError::InvalidArgument(message.into())
    }

    /// Returns `true` for input-validation failures.
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, PricingError::InvalidArgument(_))
    }
}

/// Result type returned by pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;
