//! Interval records of a finished inversion table

use std::fmt;

use crate::math::hermite::{Endpoints, HermiteCubic};

/// Stable identifier of an interval, assigned in creation order
///
/// Identifiers are never reused and stay valid while the backing storage
/// grows, unlike positions or references into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntervalId(usize);

impl IntervalId {
    /// Wrap a raw identifier
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw identifier, equal to the arena slot that holds the interval
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One piece of the piecewise inverse CDF
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    /// Identifier assigned during construction
    pub id: IntervalId,
    /// Left domain endpoint
    pub left: f64,
    /// Right domain endpoint
    pub right: f64,
    /// CDF at the left endpoint
    pub cdf_left: f64,
    /// CDF at the right endpoint
    pub cdf_right: f64,
    /// Inverse CDF as a cubic in the local CDF fraction
    pub inverse_cdf: HermiteCubic,
    /// Density as a cubic in the local CDF fraction, zero without a derivative
    pub density: HermiteCubic,
}

impl Interval {
    /// Interval with zeroed fits
    pub fn new(id: IntervalId, left: f64, right: f64, cdf_left: f64, cdf_right: f64) -> Self {
        Self {
            id,
            left,
            right,
            cdf_left,
            cdf_right,
            inverse_cdf: HermiteCubic::zero(),
            density: HermiteCubic::zero(),
        }
    }

    /// Probability mass covered by the interval
    pub fn cdf_width(&self) -> f64 {
        self.cdf_right - self.cdf_left
    }

    /// Endpoint data for fitting, given normalized endpoint densities
    pub const fn endpoints(&self, density_left: f64, density_right: f64) -> Endpoints {
        Endpoints {
            left: self.left,
            right: self.right,
            cdf_left: self.cdf_left,
            cdf_right: self.cdf_right,
            density_left,
            density_right,
        }
    }

    /// Local CDF fraction `t = (u - Fl) / (Fr - Fl)`, zero on degenerate intervals
    pub fn local_fraction(&self, u: f64) -> f64 {
        let width = self.cdf_width();
        if width > 0.0 {
            ((u - self.cdf_left) / width).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Approximate inverse CDF at `u`, kept inside `[left, right]`
    pub fn quantile(&self, u: f64) -> f64 {
        self.inverse_cdf
            .evaluate(self.local_fraction(u))
            .clamp(self.left, self.right)
    }

    /// Approximate density at the quantile of `u`
    pub fn density_at(&self, u: f64) -> f64 {
        self.density.evaluate(self.local_fraction(u))
    }
}
