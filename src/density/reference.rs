//! Reference densities with analytic derivatives
//!
//! These cover the common shapes a table is built for and, where a closed
//! form exists, expose the normalized CDF so tables can be checked against
//! the exact quantile function.

use crate::density::Density;
use crate::io::error::{Result, invalid_parameter};
use crate::math::probability::standard_normal_cdf;

fn validate_support(left: f64, right: f64) -> Result<()> {
    if !left.is_finite() || !right.is_finite() || left >= right {
        return Err(invalid_parameter(
            "support",
            &format!("[{left}, {right}]"),
            &"support must be a finite range with left < right",
        ));
    }
    Ok(())
}

fn validate_positive(parameter: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid_parameter(
            parameter,
            &value,
            &"must be finite and strictly positive",
        ));
    }
    Ok(())
}

/// Constant density on `[left, right]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniform {
    left: f64,
    right: f64,
}

impl Uniform {
    /// Create a uniform density on `[left, right]`
    ///
    /// # Errors
    ///
    /// Returns an error if the support is empty or not finite
    pub fn new(left: f64, right: f64) -> Result<Self> {
        validate_support(left, right)?;
        Ok(Self { left, right })
    }

    /// Support as `(left, right)`
    pub const fn support(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    /// Normalized CDF
    pub fn cdf(&self, x: f64) -> f64 {
        ((x - self.left) / (self.right - self.left)).clamp(0.0, 1.0)
    }
}

impl Density for Uniform {
    fn value(&self, x: f64) -> f64 {
        if (self.left..=self.right).contains(&x) {
            1.0
        } else {
            0.0
        }
    }

    fn has_derivative(&self) -> bool {
        true
    }

    fn derivative(&self, _x: f64) -> Option<f64> {
        Some(0.0)
    }
}

/// Gaussian density restricted to `[left, right]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TruncatedNormal {
    mean: f64,
    std_dev: f64,
    left: f64,
    right: f64,
}

impl TruncatedNormal {
    /// Create a truncated normal density
    ///
    /// # Errors
    ///
    /// Returns an error if the mean is not finite, the standard deviation is
    /// not strictly positive, or the support is invalid
    pub fn new(mean: f64, std_dev: f64, left: f64, right: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(invalid_parameter("mean", &mean, &"must be finite"));
        }
        validate_positive("std_dev", std_dev)?;
        validate_support(left, right)?;
        Ok(Self {
            mean,
            std_dev,
            left,
            right,
        })
    }

    /// Support as `(left, right)`
    pub const fn support(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    fn standardize(&self, x: f64) -> f64 {
        (x - self.mean) / self.std_dev
    }

    /// Normalized CDF
    pub fn cdf(&self, x: f64) -> f64 {
        let x = x.clamp(self.left, self.right);
        let lower = standard_normal_cdf(self.standardize(self.left));
        let upper = standard_normal_cdf(self.standardize(self.right));
        ((standard_normal_cdf(self.standardize(x)) - lower) / (upper - lower)).clamp(0.0, 1.0)
    }
}

impl Density for TruncatedNormal {
    fn value(&self, x: f64) -> f64 {
        let z = self.standardize(x);
        (-0.5 * z * z).exp()
    }

    fn has_derivative(&self) -> bool {
        true
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        let z = self.standardize(x);
        Some(-z / self.std_dev * self.value(x))
    }
}

/// Exponential density restricted to `[left, right]`
///
/// The density is anchored at the left endpoint, `exp(-rate (x - left))`,
/// so far-from-origin supports do not underflow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TruncatedExponential {
    rate: f64,
    left: f64,
    right: f64,
}

impl TruncatedExponential {
    /// Create a truncated exponential density
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is not strictly positive or the support
    /// is invalid
    pub fn new(rate: f64, left: f64, right: f64) -> Result<Self> {
        validate_positive("rate", rate)?;
        validate_support(left, right)?;
        Ok(Self { rate, left, right })
    }

    /// Support as `(left, right)`
    pub const fn support(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    /// Normalized CDF
    pub fn cdf(&self, x: f64) -> f64 {
        let x = x.clamp(self.left, self.right);
        let total = -(-self.rate * (self.right - self.left)).exp_m1();
        (-(-self.rate * (x - self.left)).exp_m1() / total).clamp(0.0, 1.0)
    }
}

impl Density for TruncatedExponential {
    fn value(&self, x: f64) -> f64 {
        (-self.rate * (x - self.left)).exp()
    }

    fn has_derivative(&self) -> bool {
        true
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        Some(-self.rate * self.value(x))
    }
}

/// Unnormalized Fermi-Dirac momentum density `x^2 / (exp((x - mu) / T) + 1)`
///
/// Zero for `x <= 0`; tables should start just above the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FermiDirac {
    temperature: f64,
    chemical_potential: f64,
}

impl FermiDirac {
    /// Create a Fermi-Dirac density
    ///
    /// # Errors
    ///
    /// Returns an error if the temperature is not strictly positive or the
    /// chemical potential is not finite
    pub fn new(temperature: f64, chemical_potential: f64) -> Result<Self> {
        validate_positive("temperature", temperature)?;
        if !chemical_potential.is_finite() {
            return Err(invalid_parameter(
                "chemical_potential",
                &chemical_potential,
                &"must be finite",
            ));
        }
        Ok(Self {
            temperature,
            chemical_potential,
        })
    }

    // Written as 1 / (1 + e) so overflow of e yields 0 rather than NaN
    fn occupancy(&self, x: f64) -> f64 {
        1.0 / (1.0 + ((x - self.chemical_potential) / self.temperature).exp())
    }
}

impl Density for FermiDirac {
    fn value(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        x * x * self.occupancy(x)
    }

    fn has_derivative(&self) -> bool {
        true
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        if x <= 0.0 {
            return Some(0.0);
        }
        let n = self.occupancy(x);
        Some((2.0 * x).mul_add(n, -(x * x * n * (1.0 - n) / self.temperature)))
    }
}
