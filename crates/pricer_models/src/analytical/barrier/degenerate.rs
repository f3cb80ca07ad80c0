//! Deterministic limit for zero volatility or zero time to expiry.
//!
//! The general formula divides by `σ√T`, so this branch is evaluated
//! exactly instead. The underlying follows its forward
//! `F = S·e^(bT)`; the barrier counts as touched when the forward sits at
//! or beyond the level (`F <= H` for a down barrier, `F >= H` for an up
//! barrier).
//!
//! | Case | Touched | Not touched |
//! |------|---------|-------------|
//! | knock-in | intrinsic | `R·e^(-rT)` |
//! | knock-out | `R` (paid now) | intrinsic |
//!
//! Intrinsic is the discounted forward payoff
//! `max(φ·(S·e^((b-r)T) - K·e^(-rT)), 0)`.

use tracing::debug;

use super::sensitivities::{DerivativeVector, Sensitivity, ValueDerivatives};
use crate::instruments::{Barrier, BarrierDirection, KnockType, VanillaOption};

/// Returns `true` when the deterministic forward has reached the barrier.
pub fn forward_touches_barrier(barrier: &Barrier, forward: f64) -> bool {
    match barrier.direction() {
        BarrierDirection::Down => forward <= barrier.level(),
        BarrierDirection::Up => forward >= barrier.level(),
    }
}

/// Value and exact sub-gradient of the deterministic limit.
pub fn degenerate_value(
    option: &VanillaOption,
    barrier: &Barrier,
    rebate: f64,
    spot: f64,
    cost_of_carry: f64,
    rate: f64,
) -> ValueDerivatives {
    let t = option.time_to_expiry();
    let forward = spot * (cost_of_carry * t).exp();
    let touched = forward_touches_barrier(barrier, forward);

    debug!(
        forward,
        level = barrier.level(),
        touched,
        knock = ?barrier.knock_type(),
        "pricing deterministic barrier limit"
    );

    match (barrier.knock_type(), touched) {
        (KnockType::In, true) | (KnockType::Out, false) => {
            intrinsic(option, spot, cost_of_carry, rate)
        }
        (KnockType::In, false) => discounted_rebate(rebate, rate, t),
        (KnockType::Out, true) => ValueDerivatives::new(rebate, DerivativeVector::zeros()),
    }
}

fn intrinsic(option: &VanillaOption, spot: f64, cost_of_carry: f64, rate: f64) -> ValueDerivatives {
    let t = option.time_to_expiry();
    let k = option.strike();
    let phi = option.option_type().sign();
    let df1 = ((cost_of_carry - rate) * t).exp();
    let df2 = (-rate * t).exp();
    let value = phi * (spot * df1 - k * df2);

    if value <= 0.0 {
        return ValueDerivatives::default();
    }

    let mut d = DerivativeVector::zeros();
    d[Sensitivity::Spot] = phi * df1;
    d[Sensitivity::Strike] = -phi * df2;
    d[Sensitivity::Rate] = -t * value;
    d[Sensitivity::CostOfCarry] = phi * spot * t * df1;
    d[Sensitivity::Time] = phi * (spot * df1 * (cost_of_carry - rate) + k * df2 * rate);
    ValueDerivatives::new(value, d)
}

fn discounted_rebate(rebate: f64, rate: f64, t: f64) -> ValueDerivatives {
    let value = rebate * (-rate * t).exp();
    let mut d = DerivativeVector::zeros();
    d[Sensitivity::Rate] = -t * value;
    d[Sensitivity::Time] = -rate * value;
    ValueDerivatives::new(value, d)
}
