//! Adjoint sensitivities against bump-and-revalue.
//!
//! Every dispatch key is checked at spots in, at and out of the money on
//! both sides of the strike, with and without a rebate.

use pricer_models::analytical::barrier::{
    finite_difference_derivatives, BlackBarrierPricer, DispatchKey, FiniteDifferenceConfig,
    Sensitivity, ValueDerivatives,
};
use pricer_models::instruments::{Barrier, BarrierDirection, VanillaOption};

const CARRY: f64 = 0.02;
const RATE: f64 = 0.04;
const VOL: f64 = 0.25;

fn assert_close(adjoint: &ValueDerivatives, bumped: &ValueDerivatives, context: &str) {
    assert_eq!(adjoint.value, bumped.value, "{}: value", context);
    for sensitivity in Sensitivity::ALL {
        let a = adjoint.derivatives[sensitivity];
        let b = bumped.derivatives[sensitivity];
        let tolerance = 1e-5 + 1e-4 * b.abs();
        assert!(
            (a - b).abs() <= tolerance,
            "{}: {} adjoint {} vs bumped {}",
            context,
            sensitivity,
            a,
            b
        );
    }
}

fn check_grid(rebate: f64, expiry: f64) {
    let pricer = BlackBarrierPricer::new();
    let config = FiniteDifferenceConfig::default();

    for key in DispatchKey::all() {
        let (level, spots) = match key.direction() {
            BarrierDirection::Down => (80.0, [88.0, 100.0, 115.0]),
            BarrierDirection::Up => (125.0, [85.0, 100.0, 117.0]),
        };
        let strike = match (key.direction(), key.strike_above_barrier()) {
            (BarrierDirection::Down, true) => 100.0,
            (BarrierDirection::Down, false) => 75.0,
            (BarrierDirection::Up, true) => 135.0,
            (BarrierDirection::Up, false) => 100.0,
        };
        let option = VanillaOption::new(strike, expiry, key.option_type()).unwrap();
        let barrier = Barrier::new(key.knock_type(), key.direction(), level).unwrap();
        assert_eq!(DispatchKey::for_contract(&option, &barrier), key);

        for spot in spots {
            let adjoint = pricer
                .price_with_derivatives(&option, &barrier, rebate, spot, CARRY, RATE, VOL)
                .unwrap();
            let bumped = finite_difference_derivatives(
                &pricer, &config, &option, &barrier, rebate, spot, CARRY, RATE, VOL,
            )
            .unwrap();
            let context = format!("{} spot {} rebate {} expiry {}", key, spot, rebate, expiry);
            assert_close(&adjoint, &bumped, &context);
        }
    }
}

#[test]
fn test_adjoint_matches_bumps_without_rebate() {
    check_grid(0.0, 1.0);
}

#[test]
fn test_adjoint_matches_bumps_with_rebate() {
    check_grid(3.0, 1.0);
}

#[test]
fn test_adjoint_matches_bumps_long_expiry() {
    check_grid(1.5, 4.0);
}

#[test]
fn test_adjoint_matches_bumps_with_negative_rate() {
    // Knock-ins never need λ, so a strongly negative rate stays priceable.
    let pricer = BlackBarrierPricer::new();
    let config = FiniteDifferenceConfig::default();
    let option = VanillaOption::call(100.0, 2.0).unwrap();
    for barrier in [Barrier::down_in(85.0).unwrap(), Barrier::up_in(120.0).unwrap()] {
        let adjoint = pricer
            .price_with_derivatives(&option, &barrier, 2.0, 100.0, -0.05, -0.3, VOL)
            .unwrap();
        let bumped = finite_difference_derivatives(
            &pricer, &config, &option, &barrier, 2.0, 100.0, -0.05, -0.3, VOL,
        )
        .unwrap();
        assert_close(&adjoint, &bumped, "negative rate knock-in");
    }
}

#[test]
fn test_adjoint_matches_bumps_on_deterministic_branch() {
    let pricer = BlackBarrierPricer::new();
    let config = FiniteDifferenceConfig::default();
    let option = VanillaOption::put(100.0, 1.0).unwrap();
    let barrier = Barrier::up_out(130.0).unwrap();

    let adjoint = pricer
        .price_with_derivatives(&option, &barrier, 1.0, 90.0, CARRY, RATE, 0.0)
        .unwrap();
    let bumped =
        finite_difference_derivatives(&pricer, &config, &option, &barrier, 1.0, 90.0, CARRY, RATE, 0.0)
            .unwrap();

    // Volatility is a kink at zero; only the smooth slots are compared.
    for sensitivity in [
        Sensitivity::Spot,
        Sensitivity::Strike,
        Sensitivity::Rate,
        Sensitivity::CostOfCarry,
        Sensitivity::Time,
    ] {
        let (a, b) = (adjoint.derivatives[sensitivity], bumped.derivatives[sensitivity]);
        assert!((a - b).abs() <= 1e-6 + 1e-6 * b.abs(), "{}: {} vs {}", sensitivity, a, b);
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_adjoint_matches_bumps(
            index in 0usize..DispatchKey::COUNT,
            spot in 70.0..130.0f64,
            strike_ratio in 0.7..1.3f64,
            gap in 0.05..0.4f64,
            rebate in 0.0..3.0f64,
            carry in -0.03..0.08f64,
            rate in 0.0..0.08f64,
            vol in 0.15..0.45f64,
            expiry in 0.25..3.0f64,
        ) {
            let key = DispatchKey::from_index(index).unwrap();
            let level = match key.direction() {
                BarrierDirection::Down => spot * (1.0 - gap),
                BarrierDirection::Up => spot * (1.0 + gap),
            };
            let option = VanillaOption::new(spot * strike_ratio, expiry, key.option_type()).unwrap();
            let barrier = Barrier::new(key.knock_type(), key.direction(), level).unwrap();

            let pricer = BlackBarrierPricer::new();
            let adjoint = pricer
                .price_with_derivatives(&option, &barrier, rebate, spot, carry, rate, vol)
                .unwrap();
            let bumped = finite_difference_derivatives(
                &pricer,
                &FiniteDifferenceConfig::default(),
                &option,
                &barrier,
                rebate,
                spot,
                carry,
                rate,
                vol,
            )
            .unwrap();

            for sensitivity in Sensitivity::ALL {
                let (a, b) = (adjoint.derivatives[sensitivity], bumped.derivatives[sensitivity]);
                prop_assert!(
                    (a - b).abs() <= 1e-5 + 1e-4 * b.abs(),
                    "{} {}: adjoint {} vs bumped {}",
                    key,
                    sensitivity,
                    a,
                    b
                );
            }
        }
    }
}
