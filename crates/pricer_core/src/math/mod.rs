//! Numerical building blocks shared by the pricing engines.
//!
//! - `distributions`: standard normal CDF/PDF behind the [`NormalDistribution`] seam
//! - `comparison`: tolerance-based float equality
//!
//! [`NormalDistribution`]: distributions::NormalDistribution

pub mod comparison;
pub mod distributions;

pub use comparison::close_equals;
pub use distributions::{norm_cdf, norm_pdf, NormalDistribution, StandardNormal};
