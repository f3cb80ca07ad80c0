//! Financial instrument definitions.
//!
//! - [`VanillaOption`]: strike, expiry and call/put flag
//! - [`Barrier`]: knock type, direction and level of a single barrier

pub mod barrier;
pub mod vanilla;

pub use barrier::{Barrier, BarrierDirection, KnockType, ObservationType};
pub use vanilla::{OptionType, VanillaOption};
