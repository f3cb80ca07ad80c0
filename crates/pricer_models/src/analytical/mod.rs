//! Analytical pricing formulas for European options.
//!
//! This module provides closed-form solutions:
//! - Generalised Black-Scholes for vanilla calls and puts
//! - Reiner-Rubinstein single-barrier valuation with adjoint Greeks

pub mod barrier;
pub mod black_scholes;

pub use barrier::{BlackBarrierPricer, DerivativeVector, Sensitivity, ValueDerivatives};
pub use black_scholes::BlackScholes;
