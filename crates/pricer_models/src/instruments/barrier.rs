//! Single-barrier contract terms.
//!
//! # Barrier Types
//!
//! There are 8 types of single-barrier options:
//! - **Down-and-In/Out Call**: Barrier below spot
//! - **Down-and-In/Out Put**: Barrier below spot
//! - **Up-and-In/Out Call**: Barrier above spot
//! - **Up-and-In/Out Put**: Barrier above spot
//!
//! # Key Relationship
//!
//! **In-Out Parity**: Knock-In + Knock-Out = Vanilla

use pricer_core::types::{PricingError, PricingResult};

/// Barrier option direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BarrierDirection {
    /// Barrier is below the current spot price
    Down,
    /// Barrier is above the current spot price
    Up,
}

impl BarrierDirection {
    /// Reflection sign `eta`: `+1` for a down barrier, `-1` for an up barrier.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            BarrierDirection::Down => 1.0,
            BarrierDirection::Up => -1.0,
        }
    }
}

/// Barrier option knock type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum KnockType {
    /// Option is activated (knocked in) when barrier is hit
    In,
    /// Option is deactivated (knocked out) when barrier is hit
    Out,
}

/// How the barrier is monitored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ObservationType {
    /// Continuous monitoring over the whole life of the option
    #[default]
    Continuous,
}

/// Continuously monitored single barrier.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{Barrier, BarrierDirection, KnockType};
///
/// let barrier = Barrier::new(KnockType::In, BarrierDirection::Down, 90.0).unwrap();
/// assert!(!barrier.is_breached_by(95.0));
/// assert!(!barrier.is_breached_by(90.0));
/// assert!(barrier.is_breached_by(85.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Barrier {
    knock_type: KnockType,
    direction: BarrierDirection,
    level: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    observation: ObservationType,
}

impl Barrier {
    /// Creates a continuously monitored barrier.
    ///
    /// # Errors
    /// `PricingError::InvalidArgument` if `level` is not positive and finite.
    pub fn new(knock_type: KnockType, direction: BarrierDirection, level: f64) -> PricingResult<Self> {
        if !level.is_finite() || level <= 0.0 {
            return Err(PricingError::InvalidArgument(format!(
                "barrier level must be positive and finite, got {}",
                level
            )));
        }
        Ok(Self {
            knock_type,
            direction,
            level,
            observation: ObservationType::Continuous,
        })
    }

    /// Down-and-in barrier.
    pub fn down_in(level: f64) -> PricingResult<Self> {
        Self::new(KnockType::In, BarrierDirection::Down, level)
    }
    /// Down-and-out barrier.
    pub fn down_out(level: f64) -> PricingResult<Self> {
        Self::new(KnockType::Out, BarrierDirection::Down, level)
    }
    /// Up-and-in barrier.
    pub fn up_in(level: f64) -> PricingResult<Self> {
        Self::new(KnockType::In, BarrierDirection::Up, level)
    }
    /// Up-and-out barrier.
    pub fn up_out(level: f64) -> PricingResult<Self> {
        Self::new(KnockType::Out, BarrierDirection::Up, level)
    }

    /// Same barrier with the opposite knock type.
    pub fn with_knock_type(&self, knock_type: KnockType) -> Self {
        Self { knock_type, ..*self }
    }

    /// Same barrier at a different level.
    pub fn with_level(&self, level: f64) -> PricingResult<Self> {
        Self::new(self.knock_type, self.direction, level)
    }

    /// Returns the knock type.
    #[inline]
    pub fn knock_type(&self) -> KnockType {
        self.knock_type
    }

    /// Returns the barrier direction.
    #[inline]
    pub fn direction(&self) -> BarrierDirection {
        self.direction
    }

    /// Returns the barrier level.
    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Returns the monitoring style.
    #[inline]
    pub fn observation(&self) -> ObservationType {
        self.observation
    }

    /// Returns `true` when `spot` already sits beyond the barrier.
    ///
    /// A spot exactly at the level is not breached.
    #[inline]
    pub fn is_breached_by(&self, spot: f64) -> bool {
        match self.direction {
            BarrierDirection::Down => spot < self.level,
            BarrierDirection::Up => spot > self.level,
        }
    }
}
