//! Tests for cubic Hermite fits of the inverse CDF and the density

#[cfg(test)]
mod tests {
    use crate::math::hermite::{
        Endpoints, HermiteCubic, fit_density, fit_inverse_cdf, fit_linear, is_monotone,
    };

    const ENDS: Endpoints = Endpoints {
        left: 1.0,
        right: 3.0,
        cdf_left: 0.2,
        cdf_right: 0.6,
        density_left: 0.1,
        density_right: 0.4,
    };

    fn slope_at(cubic: &HermiteCubic, t: f64) -> f64 {
        let [_, c1, c2, c3] = cubic.coefficients();
        (3.0 * c3).mul_add(t * t, (2.0 * c2).mul_add(t, c1))
    }

    // Tests the inverse CDF fit matches endpoint values and reciprocal densities
    // Verified by swapping the endpoint densities in the quadratic coefficient
    #[test]
    fn test_inverse_cdf_fit_matches_hermite_conditions() {
        let fit = fit_inverse_cdf(&ENDS);
        let mass = ENDS.cdf_width();

        assert!((fit.evaluate(0.0) - 1.0).abs() < 1e-12);
        assert!((fit.evaluate(1.0) - 3.0).abs() < 1e-12);
        assert!((slope_at(&fit, 0.0) - mass / 0.1).abs() < 1e-12);
        assert!((slope_at(&fit, 1.0) - mass / 0.4).abs() < 1e-12);
    }

    // Tests the density fit matches endpoint densities and scaled log slopes
    // Verified by using the raw derivative instead of the logarithmic one
    #[test]
    fn test_density_fit_matches_hermite_conditions() {
        let fit = fit_density(&ENDS, -2.0, 0.5);
        let mass = ENDS.cdf_width();

        assert!((fit.evaluate(0.0) - 0.1).abs() < 1e-12);
        assert!((fit.evaluate(1.0) - 0.4).abs() < 1e-12);
        assert!((slope_at(&fit, 0.0) - mass * -2.0).abs() < 1e-12);
        assert!((slope_at(&fit, 1.0) - mass * 0.5).abs() < 1e-12);
    }

    // Tests the monotonicity condition and that accepted fits never decrease
    // Verified by comparing against the endpoint density instead of three times it
    #[test]
    fn test_monotone_condition() {
        // Mean density is 0.2: within three times 0.1 and 0.4
        assert!(is_monotone(&ENDS));
        let fit = fit_inverse_cdf(&ENDS);
        let values: Vec<f64> = (0..=100).map(|k| fit.evaluate(f64::from(k) / 100.0)).collect();
        assert!(values.windows(2).all(|pair| matches!(pair, [a, b] if a <= b)));

        let steep = Endpoints {
            density_left: 0.05,
            ..ENDS
        };
        assert!(!is_monotone(&steep));
        assert!((steep.mean_density() - 0.2).abs() < 1e-15);
    }

    // Tests the linear fit ignores endpoint densities and spans the interval
    // Verified by deriving the slope from the left endpoint density
    #[test]
    fn test_linear_fit_spans_interval() {
        let flat = Endpoints {
            density_left: 1e300,
            density_right: 1e-300,
            ..ENDS
        };
        let fit = fit_linear(&flat);
        assert_eq!(fit.coefficients(), [1.0, 2.0, 0.0, 0.0]);
        assert_eq!(fit.evaluate(0.0), 1.0);
        assert_eq!(fit.evaluate(1.0), 3.0);
        assert!((fit.evaluate(0.25) - 1.5).abs() < 1e-15);
    }

    // Tests Horner evaluation for single precision coefficients
    // Verified by evaluating with coefficients in reverse order
    #[test]
    fn test_generic_evaluation() {
        let cubic = HermiteCubic::<f32>::from_coefficients([1.0, -2.0, 0.5, 3.0]);
        assert!((cubic.evaluate(2.0) - 23.0).abs() < f32::EPSILON);
        assert!(cubic.is_finite());
        assert_eq!(HermiteCubic::<f32>::default(), HermiteCubic::zero());
        assert!(!HermiteCubic::from_coefficients([0.0, f64::NAN, 0.0, 0.0]).is_finite());
    }
}
