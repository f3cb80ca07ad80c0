//! Single-barrier option valuation under the Black model.
//!
//! Implements the Reiner-Rubinstein closed form for continuously monitored
//! barriers together with its hand-derived adjoint.
//!
//! # Structure
//!
//! - [`dispatch`]: the 16-entry table selecting a signed combination of terms
//! - [`kernels`]: the reflection terms `A`..`F`
//! - [`adjoint`]: the same terms with their local partials
//! - [`degenerate`]: the exact zero-volatility / zero-time limit
//! - [`pricer`]: [`BlackBarrierPricer`], the public entry point
//! - [`finite_difference`]: bump-and-revalue counterpart of the adjoint
//!
//! # Key Relationship
//!
//! **In-Out Parity**: Knock-In + Knock-Out = Vanilla (+ rebate when `r = b = 0`)

pub mod adjoint;
pub mod config;
pub mod degenerate;
pub mod dispatch;
pub mod finite_difference;
pub mod kernels;
pub mod pricer;
pub mod sensitivities;

pub use config::{BarrierEngineConfig, BarrierEngineConfigBuilder, DEFAULT_ZERO_TOLERANCE};
pub use dispatch::{DispatchKey, RebateTerm, TermCombination, DISPATCH_TABLE};
pub use finite_difference::{
    finite_difference_derivatives, FiniteDifferenceConfig, FiniteDifferenceConfigBuilder,
};
pub use pricer::BlackBarrierPricer;
pub use sensitivities::{DerivativeVector, Sensitivity, ValueDerivatives};
