//! Density capability consumed by table construction
//!
//! A density is any possibly unnormalized, non-negative function on the
//! sampling domain. Its derivative is optional; supplying one lets the
//! finished table interpolate the density itself as well as the inverse CDF.

use crate::io::error::{Result, density_error};

/// Built-in densities with analytic derivatives and closed-form CDFs
pub mod reference;

/// A univariate, possibly unnormalized probability density
pub trait Density {
    /// Density value at `x`
    fn value(&self, x: f64) -> f64;

    /// Whether [`Density::derivative`] yields values
    fn has_derivative(&self) -> bool {
        false
    }

    /// Derivative of the density at `x`, if available
    fn derivative(&self, _x: f64) -> Option<f64> {
        None
    }
}

impl<D: Density + ?Sized> Density for &D {
    fn value(&self, x: f64) -> f64 {
        (**self).value(x)
    }

    fn has_derivative(&self) -> bool {
        (**self).has_derivative()
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        (**self).derivative(x)
    }
}

/// Evaluate the density, rejecting NaN, infinite and negative values
///
/// # Errors
///
/// Returns a density error naming `x` and the offending value
pub fn checked_value<D: Density + ?Sized>(density: &D, x: f64) -> Result<f64> {
    let value = density.value(x);
    if value.is_nan() {
        return Err(density_error(x, value, "density returned NaN"));
    }
    if value.is_infinite() {
        return Err(density_error(x, value, "density returned an infinite value"));
    }
    if value < 0.0 {
        return Err(density_error(x, value, "density returned a negative value"));
    }
    Ok(value)
}

/// Evaluate the density derivative, rejecting missing and non-finite values
///
/// # Errors
///
/// Returns a density error if the derivative is unavailable or not finite
pub fn checked_derivative<D: Density + ?Sized>(density: &D, x: f64) -> Result<f64> {
    match density.derivative(x) {
        Some(value) if value.is_finite() => Ok(value),
        Some(value) => Err(density_error(
            x,
            value,
            "density derivative is not finite",
        )),
        None => Err(density_error(
            x,
            f64::NAN,
            "density derivative is unavailable",
        )),
    }
}

/// Signature of a parameterized density or derivative callable
pub type DensityFn<P> = fn(f64, &P) -> f64;

/// Density built from closures over caller-supplied parameters
///
/// The parameters are handed to every call unmodified, so one closure can
/// serve a whole family of distributions.
///
/// ```
/// use invtable::density::{Density, FnDensity};
///
/// let shifted = FnDensity::new(2.0, |x: f64, shift: &f64| (-(x - shift).powi(2)).exp())
///     .with_derivative(|x: f64, shift: &f64| -2.0 * (x - shift) * (-(x - shift).powi(2)).exp());
/// assert!(shifted.has_derivative());
/// assert!((shifted.value(2.0) - 1.0).abs() < f64::EPSILON);
/// ```
#[derive(Clone, Debug)]
pub struct FnDensity<P, F, G> {
    params: P,
    value: F,
    derivative: Option<G>,
}

impl<P, F> FnDensity<P, F, DensityFn<P>>
where
    F: Fn(f64, &P) -> f64,
{
    /// Create a density without a derivative
    pub fn new(params: P, value: F) -> Self {
        Self {
            params,
            value,
            derivative: None,
        }
    }
}

impl<P, F, G> FnDensity<P, F, G> {
    /// Attach a derivative callable
    pub fn with_derivative<H>(self, derivative: H) -> FnDensity<P, F, H>
    where
        H: Fn(f64, &P) -> f64,
    {
        FnDensity {
            params: self.params,
            value: self.value,
            derivative: Some(derivative),
        }
    }

    /// Parameters passed to every call
    pub const fn params(&self) -> &P {
        &self.params
    }
}

impl<P, F, G> Density for FnDensity<P, F, G>
where
    F: Fn(f64, &P) -> f64,
    G: Fn(f64, &P) -> f64,
{
    fn value(&self, x: f64) -> f64 {
        (self.value)(x, &self.params)
    }

    fn has_derivative(&self) -> bool {
        self.derivative.is_some()
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        self.derivative.as_ref().map(|derivative| derivative(x, &self.params))
    }
}
