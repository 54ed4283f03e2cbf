//! Tests for the two-phase interval refiner

#[cfg(test)]
mod tests {
    use crate::algorithm::builder::BuildConfig;
    use crate::algorithm::refinement::{FitReport, RefinementPhase, Refiner, refine};
    use crate::density::{Density, FnDensity};
    use crate::density::reference::{TruncatedExponential, TruncatedNormal, Uniform};
    use crate::io::configuration::COLLAPSED_CDF_WIDTH;
    use crate::io::error::SamplerError;

    fn assert_tiles(intervals: &[crate::sampling::interval::Interval], left: f64, right: f64) {
        let first = intervals.first().expect("at least one interval");
        let last = intervals.last().expect("at least one interval");
        assert_eq!(first.left, left);
        assert_eq!(last.right, right);
        assert_eq!(first.cdf_left, 0.0);
        assert_eq!(last.cdf_right, 1.0);
        for pair in intervals.windows(2) {
            if let [current, next] = pair {
                assert_eq!(current.right, next.left);
                assert_eq!(current.cdf_right, next.cdf_left);
                assert!(current.cdf_left <= next.cdf_left);
            }
        }
    }

    // Tests the coverage phase bounds every interval's CDF width
    // Verified by splitting only intervals above twice the configured width
    #[test]
    fn test_cover_bounds_cdf_width() {
        let normal = TruncatedNormal::new(0.0, 1.0, -4.0, 4.0).expect("valid normal");
        let config = BuildConfig::default();
        let mut refiner = Refiner::new(&normal, -4.0, 4.0, &config).expect("refiner");
        refiner.cover().expect("coverage converges");

        let widths: Vec<f64> = refiner
            .arena()
            .linked()
            .map(|node| node.interval.cdf_width())
            .collect();
        assert!(widths.iter().all(|&w| w <= config.max_cdf_width));
        assert!((widths.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    // Tests the uniform density settles at the coverage partition with exact linear fits
    // Verified by fitting with unnormalized endpoint densities
    #[test]
    fn test_uniform_density_needs_no_accuracy_splits() {
        let uniform = Uniform::new(0.0, 1.0).expect("valid uniform");
        let refinement = refine(&uniform, 0.0, 1.0, &BuildConfig::default()).expect("refines");

        // 1/32 is the first halving not above a CDF width of 0.05
        assert_eq!(refinement.intervals.len(), 32);
        assert_tiles(&refinement.intervals, 0.0, 1.0);
        for interval in &refinement.intervals {
            let [a0, a1, a2, a3] = interval.inverse_cdf.coefficients();
            assert!((a0 - interval.left).abs() < 1e-15);
            assert!((a1 - (interval.right - interval.left)).abs() < 1e-12);
            assert!(a2.abs() < 1e-12 && a3.abs() < 1e-12);
        }
    }

    // Tests the refined partition meets the tolerance at every interval midpoint
    // Verified by accepting fits regardless of the CDF error
    #[test]
    fn test_refined_intervals_meet_tolerance() {
        let normal = TruncatedNormal::new(1.0, 0.5, -1.0, 3.0).expect("valid normal");
        let config = BuildConfig {
            tolerance: 1e-7,
            ..BuildConfig::default()
        };
        let refinement = refine(&normal, -1.0, 3.0, &config).expect("refines");
        assert_tiles(&refinement.intervals, -1.0, 3.0);

        for interval in &refinement.intervals {
            let u = 0.5 * (interval.cdf_left + interval.cdf_right);
            let x = interval.quantile(u);
            assert!(
                (normal.cdf(x) - u).abs() < 1e-5,
                "midpoint error too large on [{}, {}]",
                interval.left,
                interval.right
            );
        }
    }

    // Tests the fit report logic that drives splitting
    // Verified by ignoring monotonicity in accepts
    #[test]
    fn test_fit_report_accepts() {
        let good = FitReport {
            cdf_error: 1e-8,
            density_error: 0.0,
            monotone: true,
        };
        assert!(good.accepts(1e-6));
        assert!(!FitReport { monotone: false, ..good }.accepts(1e-6));
        assert!(!FitReport { cdf_error: 1e-3, ..good }.accepts(1e-6));
        assert!(!FitReport { density_error: f64::INFINITY, ..good }.accepts(1e-6));
    }

    // Tests a steep exponential forces splits that restore monotonicity
    // Verified by skipping the split on non-monotone fits
    #[test]
    fn test_first_fit_of_steep_density_is_rejected() {
        let steep = TruncatedExponential::new(40.0, 0.0, 1.0).expect("valid exponential");
        let config = BuildConfig {
            max_cdf_width: 1.0,
            ..BuildConfig::default()
        };
        let mut refiner = Refiner::new(&steep, 0.0, 1.0, &config).expect("refiner");
        let head = refiner.arena().head();
        let report = refiner.fit(head).expect("fit evaluates");
        assert!(!report.monotone);
        assert!(!report.accepts(config.tolerance));

        refiner.fit_all().expect("accuracy converges");
        assert!(refiner.arena().len() > 1);
    }

    // Tests the derivative-based density fit is computed and checked
    // Verified by storing zero density coefficients when a derivative is supplied
    #[test]
    fn test_density_fit_tracks_density() {
        let normal = TruncatedNormal::new(0.0, 1.0, -3.0, 3.0).expect("valid normal");
        let config = BuildConfig::default();
        let refinement = refine(&normal, -3.0, 3.0, &config).expect("refines");

        for interval in &refinement.intervals {
            let expected = refinement.norm * normal.value(interval.left);
            assert!((interval.density_at(interval.cdf_left) - expected).abs() < 1e-9);
        }
    }

    // Tests a zero endpoint density is a fatal density error
    // Verified by allowing zero endpoint densities
    #[test]
    fn test_zero_endpoint_density_is_fatal() {
        let half = FnDensity::new(0.5, |x: f64, cut: &f64| if x < *cut { 0.0 } else { 1.0 });
        let result = refine(&half, 0.0, 1.0, &BuildConfig::default());
        assert!(matches!(result, Err(SamplerError::Density { .. })));
    }

    // Tests NaN and negative densities abort refinement
    // Verified by skipping value checks in the quadrature
    #[test]
    fn test_invalid_density_values_are_rejected() {
        let nan = FnDensity::new((), |x: f64, _params: &()| if x > 0.7 { f64::NAN } else { 1.0 });
        assert!(matches!(
            refine(&nan, 0.0, 1.0, &BuildConfig::default()),
            Err(SamplerError::Density { .. })
        ));

        let negative = FnDensity::new((), |x: f64, _params: &()| x - 0.5);
        assert!(matches!(
            refine(&negative, 0.0, 1.0, &BuildConfig::default()),
            Err(SamplerError::Density { .. })
        ));
    }

    // Tests an unreachable tolerance ends with non-convergence in the accuracy phase
    // Verified by removing the interval budget
    #[test]
    fn test_unreachable_tolerance_fails_accuracy_phase() {
        let normal = TruncatedNormal::new(0.0, 1.0, -5.0, 5.0).expect("valid normal");
        let config = BuildConfig {
            tolerance: 1e-300,
            max_intervals: 200,
            ..BuildConfig::default()
        };
        match refine(&normal, -5.0, 5.0, &config) {
            Err(SamplerError::NonConvergence { phase, limit, .. }) => {
                assert_eq!(phase, RefinementPhase::Accuracy);
                assert_eq!(limit, 200);
            }
            other => unreachable!("expected non-convergence, got {other:?}"),
        }
    }

    // Tests a long exponential tail settles once CDF widths collapse to rounding steps
    // Verified by fitting collapsed intervals with the Hermite cubic
    #[test]
    fn test_collapsed_tail_intervals_are_linear() {
        let exponential = TruncatedExponential::new(1.0, 0.0, 500.0).expect("valid exponential");
        let refinement =
            refine(&exponential, 0.0, 500.0, &BuildConfig::default()).expect("tail refines");
        assert_tiles(&refinement.intervals, 0.0, 500.0);

        let collapsed: Vec<_> = refinement
            .intervals
            .iter()
            .filter(|interval| interval.cdf_width() <= COLLAPSED_CDF_WIDTH)
            .collect();
        assert!(!collapsed.is_empty());
        for interval in collapsed {
            let [a0, a1, a2, a3] = interval.inverse_cdf.coefficients();
            assert_eq!(a0, interval.left);
            assert_eq!(a1, interval.right - interval.left);
            assert_eq!((a2, a3), (0.0, 0.0));
        }
    }

    // Tests an endpoint density whose normalized reciprocal overflows is a density error
    // Verified by checking only for zero endpoint densities
    #[test]
    fn test_underflowing_endpoint_density_is_fatal() {
        let steep = FnDensity::new(200.0, |x: f64, rate: &f64| (-rate * x).exp());

        // exp(-720) is subnormal, so its reciprocal overflows
        match refine(&steep, 0.0, 3.6, &BuildConfig::default()) {
            Err(SamplerError::Density { x, .. }) => assert!(x > 3.5, "failed at {x}"),
            other => unreachable!("expected a density error, got {other:?}"),
        }

        // exp(-700) is still a normal double
        assert!(refine(&steep, 0.0, 3.5, &BuildConfig::default()).is_ok());
    }
}
