//! Tests for the density capability and closure-backed densities


#[cfg(test)]
mod tests {
    use crate::density::{Density, FnDensity, checked_derivative, checked_value};
    use crate::io::error::SamplerError;

    // Tests closure densities forward their parameters to both callables
    // Verified by passing a default parameter instead of the stored one
    #[test]
    fn test_fn_density_forwards_parameters() {
        let scaled = FnDensity::new(3.0, |x: f64, scale: &f64| scale * x)
            .with_derivative(|_x: f64, scale: &f64| *scale);

        assert!(scaled.has_derivative());
        assert!((scaled.value(2.0) - 6.0).abs() < f64::EPSILON);
        assert_eq!(scaled.derivative(5.0), Some(3.0));
        assert!((scaled.params() - 3.0).abs() < f64::EPSILON);
    }

    // Tests a density without a derivative reports none
    // Verified by defaulting has_derivative to true
    #[test]
    fn test_fn_density_without_derivative() {
        let flat = FnDensity::new((), |_x: f64, _params: &()| 1.0);
        assert!(!flat.has_derivative());
        assert_eq!(flat.derivative(0.0), None);
        assert!(matches!(
            checked_derivative(&flat, 0.0),
            Err(SamplerError::Density { .. })
        ));
    }

    fn forwarded<D: Density>(density: D) -> (bool, f64, Option<f64>) {
        (
            density.has_derivative(),
            density.value(0.25),
            density.derivative(0.25),
        )
    }

    // Tests borrowed densities behave like the density they point at
    // Verified by returning the default derivative from the reference impl
    #[test]
    fn test_reference_forwards_to_density() {
        let line = FnDensity::new((), |x: f64, _params: &()| x)
            .with_derivative(|_x: f64, _params: &()| 1.0);

        let (has_derivative, value, derivative) = forwarded(&line);
        assert!(has_derivative);
        assert!((value - 0.25).abs() < f64::EPSILON);
        assert_eq!(derivative, Some(1.0));
    }

    // Tests value checks reject NaN, infinite and negative results but accept zero
    // Verified by letting negative values through
    #[test]
    fn test_checked_value_rejects_unusable_values() {
        let density = FnDensity::new((), |x: f64, _params: &()| match x {
            x if x < 0.0 => -1.0,
            x if x < 1.0 => 0.0,
            x if x < 2.0 => f64::INFINITY,
            x if x < 3.0 => f64::NAN,
            _ => 0.5,
        });

        for x in [-1.0, 1.5, 2.5] {
            match checked_value(&density, x) {
                Err(SamplerError::Density { x: at, .. }) => assert!((at - x).abs() < f64::EPSILON),
                other => unreachable!("expected a density error at {x}, got {other:?}"),
            }
        }
        assert!(matches!(checked_value(&density, 0.5), Ok(v) if v == 0.0));
        assert!(matches!(checked_value(&density, 4.0), Ok(v) if (v - 0.5).abs() < f64::EPSILON));
    }

    // Tests non-finite derivatives are rejected
    // Verified by checking only for a missing derivative
    #[test]
    fn test_checked_derivative_rejects_non_finite() {
        let density = FnDensity::new((), |_x: f64, _params: &()| 1.0)
            .with_derivative(|x: f64, _params: &()| if x > 0.0 { f64::NAN } else { -2.0 });

        assert!(matches!(checked_derivative(&density, -1.0), Ok(v) if (v + 2.0).abs() < f64::EPSILON));
        assert!(checked_derivative(&density, 1.0).is_err());
    }
}
