//! Integration tests for module exports.
//!
//! Verify that all public modules and types are correctly exported
//! and accessible via absolute paths.

/// Test that the normal-distribution seam is accessible via absolute path.
#[test]
fn test_distributions_module_exports() {
    use pricer_core::math::distributions::norm_cdf;
    use pricer_core::math::distributions::norm_pdf;
    use pricer_core::math::distributions::NormalDistribution;
    use pricer_core::math::distributions::StandardNormal;

    let provider = StandardNormal;
    assert_eq!(provider.cdf(0.3), norm_cdf(0.3));
    assert_eq!(provider.pdf(0.3), norm_pdf(0.3));
}

/// Test that a custom provider can be plugged in behind the trait object.
#[test]
fn test_custom_provider_object_safe() {
    use pricer_core::math::NormalDistribution;

    struct Logistic;

    impl NormalDistribution for Logistic {
        fn cdf(&self, x: f64) -> f64 {
            1.0 / (1.0 + (-1.702 * x).exp())
        }

        fn pdf(&self, x: f64) -> f64 {
            let c = self.cdf(x);
            1.702 * c * (1.0 - c)
        }
    }

    let providers: Vec<Box<dyn NormalDistribution>> = vec![
        Box::new(pricer_core::math::StandardNormal),
        Box::new(Logistic),
    ];
    for p in &providers {
        assert!((p.cdf(0.0) - 0.5).abs() < 1e-12);
    }
}

/// Test that types module is accessible via absolute path.
#[test]
fn test_types_module_exports() {
    use pricer_core::types::error::PricingError;
    use pricer_core::types::PricingResult;

    fn reject() -> PricingResult<f64> {
        Err(PricingError::InvalidArgument("spot".to_string()))
    }

    assert!(reject().is_err());
}

/// Test that comparison helper is re-exported at math level.
#[test]
fn test_comparison_module_exports() {
    use pricer_core::math::close_equals;

    assert!(close_equals(0.0, 0.0, 1e-16));
}
