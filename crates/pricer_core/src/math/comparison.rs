//! Tolerance-based float comparison.

/// Returns `true` when `|a - b| <= tolerance`.
///
/// # Examples
/// ```
/// use pricer_core::math::comparison::close_equals;
///
/// assert!(close_equals(0.0, 1e-17, 1e-16));
/// assert!(!close_equals(0.0, 1e-15, 1e-16));
/// ```
#[inline]
pub fn close_equals(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}
