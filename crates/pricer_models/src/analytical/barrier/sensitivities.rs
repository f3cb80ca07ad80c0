//! Caller-facing derivative vector.
//!
//! The slot order `[spot, strike, rate, costOfCarry, volatility, time, spot²]`
//! is part of the public contract; reordering it is a breaking change.

use std::fmt;
use std::ops::{Index, IndexMut};

/// One slot of a [`DerivativeVector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Sensitivity {
    /// ∂V/∂S
    Spot,
    /// ∂V/∂K
    Strike,
    /// ∂V/∂r
    Rate,
    /// ∂V/∂b
    CostOfCarry,
    /// ∂V/∂σ
    Volatility,
    /// ∂V/∂T
    Time,
    /// ∂²V/∂S²
    SpotSpot,
}

impl Sensitivity {
    /// All slots in contract order.
    pub const ALL: [Sensitivity; 7] = [
        Sensitivity::Spot,
        Sensitivity::Strike,
        Sensitivity::Rate,
        Sensitivity::CostOfCarry,
        Sensitivity::Volatility,
        Sensitivity::Time,
        Sensitivity::SpotSpot,
    ];

    /// Position of this slot in the vector.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable short name, used for reports.
    pub fn name(self) -> &'static str {
        match self {
            Sensitivity::Spot => "spot",
            Sensitivity::Strike => "strike",
            Sensitivity::Rate => "rate",
            Sensitivity::CostOfCarry => "cost_of_carry",
            Sensitivity::Volatility => "volatility",
            Sensitivity::Time => "time",
            Sensitivity::SpotSpot => "spot_spot",
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First derivatives of a price and its second derivative along spot.
///
/// # Examples
/// ```
/// use pricer_models::analytical::barrier::{DerivativeVector, Sensitivity};
///
/// let mut d = DerivativeVector::zeros();
/// d[Sensitivity::Volatility] = 12.5;
/// assert_eq!(d.volatility(), 12.5);
/// assert_eq!(d.as_array()[4], 12.5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivativeVector([f64; 7]);

impl DerivativeVector {
    /// Number of slots.
    pub const LEN: usize = 7;

    /// Wraps raw values given in contract order.
    pub fn new(values: [f64; 7]) -> Self {
        Self(values)
    }

    /// All-zero vector.
    pub fn zeros() -> Self {
        Self([0.0; 7])
    }

    /// ∂V/∂S
    #[inline]
    pub fn spot(&self) -> f64 {
        self.0[0]
    }

    /// ∂V/∂K
    #[inline]
    pub fn strike(&self) -> f64 {
        self.0[1]
    }

    /// ∂V/∂r
    #[inline]
    pub fn rate(&self) -> f64 {
        self.0[2]
    }

    /// ∂V/∂b
    #[inline]
    pub fn cost_of_carry(&self) -> f64 {
        self.0[3]
    }

    /// ∂V/∂σ
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.0[4]
    }

    /// ∂V/∂T
    #[inline]
    pub fn time(&self) -> f64 {
        self.0[5]
    }

    /// ∂²V/∂S²
    #[inline]
    pub fn spot_spot(&self) -> f64 {
        self.0[6]
    }

    /// Raw values in contract order.
    #[inline]
    pub fn as_array(&self) -> &[f64; 7] {
        &self.0
    }

    /// Consumes the vector, returning the raw values.
    #[inline]
    pub fn into_array(self) -> [f64; 7] {
        self.0
    }

    /// `(slot, value)` pairs in contract order.
    pub fn iter(&self) -> impl Iterator<Item = (Sensitivity, f64)> + '_ {
        Sensitivity::ALL.into_iter().map(move |s| (s, self[s]))
    }

    /// `true` when every slot is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl Index<Sensitivity> for DerivativeVector {
    type Output = f64;

    fn index(&self, slot: Sensitivity) -> &f64 {
        &self.0[slot.index()]
    }
}

impl IndexMut<Sensitivity> for DerivativeVector {
    fn index_mut(&mut self, slot: Sensitivity) -> &mut f64 {
        &mut self.0[slot.index()]
    }
}

impl From<[f64; 7]> for DerivativeVector {
    fn from(values: [f64; 7]) -> Self {
        Self(values)
    }
}

/// Price together with its derivative vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueDerivatives {
    /// Present value
    pub value: f64,
    /// Sensitivities of `value`
    pub derivatives: DerivativeVector,
}

impl ValueDerivatives {
    /// Bundles a value with its derivatives.
    pub fn new(value: f64, derivatives: DerivativeVector) -> Self {
        Self { value, derivatives }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_order_is_stable() {
        let names: Vec<&str> = Sensitivity::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["spot", "strike", "rate", "cost_of_carry", "volatility", "time", "spot_spot"]
        );
        for (i, s) in Sensitivity::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn test_named_accessors() {
        let d = DerivativeVector::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(d.spot(), 1.0);
        assert_eq!(d.strike(), 2.0);
        assert_eq!(d.rate(), 3.0);
        assert_eq!(d.cost_of_carry(), 4.0);
        assert_eq!(d.volatility(), 5.0);
        assert_eq!(d.time(), 6.0);
        assert_eq!(d.spot_spot(), 7.0);
    }

    #[test]
    fn test_index_mut() {
        let mut d = DerivativeVector::zeros();
        d[Sensitivity::Time] = -0.25;
        assert_eq!(d.time(), -0.25);
        assert_eq!(d.into_array()[5], -0.25);
    }

    #[test]
    fn test_iter_pairs() {
        let d: DerivativeVector = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 9.0].into();
        let last = d.iter().last().unwrap();
        assert_eq!(last, (Sensitivity::SpotSpot, 9.0));
    }

    #[test]
    fn test_is_finite() {
        let mut d = DerivativeVector::zeros();
        assert!(d.is_finite());
        d[Sensitivity::Rate] = f64::NAN;
        assert!(!d.is_finite());
    }
}
