//! Midpoint-rule integration of densities over sub-ranges
//!
//! The rule is deliberately non-adaptive: a fixed number of equal-width
//! cells keeps every CDF evaluation deterministic, and its accuracy bounds
//! the accuracy of everything built on top of it.

use crate::density::{Density, checked_value};
use crate::io::configuration::NUMERICAL_CDF_SAMPLES;
use crate::io::error::{Result, invalid_parameter};

/// Fixed-resolution midpoint quadrature
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidpointRule {
    samples: usize,
}

impl Default for MidpointRule {
    fn default() -> Self {
        Self {
            samples: NUMERICAL_CDF_SAMPLES,
        }
    }
}

impl MidpointRule {
    /// Create a rule with the given number of subdivisions
    ///
    /// # Errors
    ///
    /// Returns an error if `samples` is zero
    pub fn new(samples: usize) -> Result<Self> {
        if samples == 0 {
            return Err(invalid_parameter(
                "quadrature_samples",
                &samples,
                &"at least one subdivision is required",
            ));
        }
        Ok(Self { samples })
    }

    /// Number of subdivisions
    pub const fn samples(&self) -> usize {
        self.samples
    }

    /// Approximate the integral of `density` from `left` to `right`
    ///
    /// Reversed bounds give the negated integral. Every density value is
    /// checked, so a NaN, infinite or negative value anywhere in the range
    /// aborts the integration.
    ///
    /// # Errors
    ///
    /// Returns a density error for the first unusable density value
    pub fn integrate<D: Density + ?Sized>(&self, density: &D, left: f64, right: f64) -> Result<f64> {
        let delta = (right - left) / self.samples as f64;
        let mut total = 0.0;
        for i in 0..self.samples {
            let x = (i as f64 + 0.5).mul_add(delta, left);
            total += checked_value(density, x)?;
        }
        Ok(total * delta)
    }
}
