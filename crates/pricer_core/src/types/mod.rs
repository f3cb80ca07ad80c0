//! Core error types.
//!
//! This module provides:
//! - `error`: Structured error types for pricing operations
//!
//! # Re-exports
//!
//! [`PricingError`] and [`PricingResult`] are re-exported at this module level.

pub mod error;

pub use error::{PricingError, PricingResult};
