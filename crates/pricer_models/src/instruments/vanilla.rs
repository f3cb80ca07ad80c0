//! Vanilla option definitions.
//!
//! This module provides the European vanilla contract that every barrier
//! option wraps: a strike, a time to expiry and a call/put flag.

use pricer_core::types::{PricingError, PricingResult};

/// Option type (call or put).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Call option
    Call,
    /// Put option
    Put,
}

impl OptionType {
    /// Payoff sign `phi`: `+1` for a call, `-1` for a put.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

/// European vanilla option.
///
/// Immutable value type. Bump-and-reprice workflows derive modified copies
/// through [`with_strike`](Self::with_strike) and
/// [`with_time_to_expiry`](Self::with_time_to_expiry) instead of mutating.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{OptionType, VanillaOption};
///
/// let call = VanillaOption::new(100.0, 1.0, OptionType::Call).unwrap();
/// assert!(call.is_call());
///
/// let bumped = call.with_strike(101.0).unwrap();
/// assert_eq!(bumped.strike(), 101.0);
/// assert_eq!(call.strike(), 100.0);
///
/// // Non-positive strikes are rejected
/// assert!(VanillaOption::new(0.0, 1.0, OptionType::Put).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VanillaOption {
    strike: f64,
    time_to_expiry: f64,
    option_type: OptionType,
}

impl VanillaOption {
    /// Creates a new vanilla option.
    ///
    /// # Arguments
    /// * `strike` - Strike price (must be positive)
    /// * `time_to_expiry` - Year fraction to expiry (must be non-negative)
    /// * `option_type` - Call or put
    ///
    /// # Errors
    /// `PricingError::InvalidArgument` if either number is non-finite or
    /// outside its domain.
    pub fn new(strike: f64, time_to_expiry: f64, option_type: OptionType) -> PricingResult<Self> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(PricingError::InvalidArgument(format!(
                "strike must be positive and finite, got {}",
                strike
            )));
        }
        if !time_to_expiry.is_finite() || time_to_expiry < 0.0 {
            return Err(PricingError::InvalidArgument(format!(
                "time to expiry must be non-negative and finite, got {}",
                time_to_expiry
            )));
        }
        Ok(Self {
            strike,
            time_to_expiry,
            option_type,
        })
    }

    /// European call.
    pub fn call(strike: f64, time_to_expiry: f64) -> PricingResult<Self> {
        Self::new(strike, time_to_expiry, OptionType::Call)
    }

    /// European put.
    pub fn put(strike: f64, time_to_expiry: f64) -> PricingResult<Self> {
        Self::new(strike, time_to_expiry, OptionType::Put)
    }

    /// Returns a copy with a different strike.
    pub fn with_strike(&self, strike: f64) -> PricingResult<Self> {
        Self::new(strike, self.time_to_expiry, self.option_type)
    }

    /// Returns a copy with a different time to expiry.
    pub fn with_time_to_expiry(&self, time_to_expiry: f64) -> PricingResult<Self> {
        Self::new(self.strike, time_to_expiry, self.option_type)
    }

    /// Returns the strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the time to expiry in years.
    #[inline]
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// Returns the option type.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Returns `true` for a call.
    #[inline]
    pub fn is_call(&self) -> bool {
        self.option_type == OptionType::Call
    }

    /// Undiscounted payoff `max(phi·(S - K), 0)` at a terminal price.
    #[inline]
    pub fn payoff(&self, terminal: f64) -> f64 {
        (self.option_type.sign() * (terminal - self.strike)).max(0.0)
    }
}
