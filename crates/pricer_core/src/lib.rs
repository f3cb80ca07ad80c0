//! # pricer_core: Mathematical Foundation for Barrier Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Error types: `PricingError`, `PricingResult` (`types::error`)
//! - The cumulative-normal provider seam: `NormalDistribution`, `StandardNormal`
//!   (`math::distributions`)
//! - Tolerance-based float comparison (`math::comparison`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - statrs: complementary error function behind the normal CDF
//! - thiserror: error derive
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::distributions::{NormalDistribution, StandardNormal};
//! use pricer_core::types::PricingError;
//!
//! let normal = StandardNormal;
//! assert!((normal.cdf(0.0) - 0.5).abs() < 1e-15);
//!
//! let err = PricingError::InvalidArgument("spot must be positive".to_string());
//! assert_eq!(format!("{}", err), "Invalid argument: spot must be positive");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for error types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
