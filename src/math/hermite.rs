//! Cubic Hermite interpolation over a local CDF fraction
//!
//! Every interval carries two cubics in `t = (u - Fl) / (Fr - Fl)`: one for
//! the inverse CDF and, when a density derivative is available, one for the
//! density along the inverse CDF. Both match value and slope at `t = 0` and
//! `t = 1`, the Hermite conditions of Hormann and Leydold's fast numerical
//! inversion.

use num_traits::Float;

/// Cubic polynomial `c0 + c1 t + c2 t^2 + c3 t^3`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HermiteCubic<T = f64> {
    coefficients: [T; 4],
}

impl<T: Float> Default for HermiteCubic<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Float> HermiteCubic<T> {
    /// Cubic with all coefficients zero
    pub fn zero() -> Self {
        Self {
            coefficients: [T::zero(); 4],
        }
    }

    /// Wrap raw coefficients, lowest order first
    pub const fn from_coefficients(coefficients: [T; 4]) -> Self {
        Self { coefficients }
    }

    /// Coefficients, lowest order first
    pub const fn coefficients(&self) -> [T; 4] {
        self.coefficients
    }

    /// Evaluate at `t` in Horner form
    pub fn evaluate(&self, t: T) -> T {
        let [c0, c1, c2, c3] = self.coefficients;
        c3.mul_add(t, c2).mul_add(t, c1).mul_add(t, c0)
    }

    /// Whether every coefficient is finite
    pub fn is_finite(&self) -> bool {
        self.coefficients.iter().all(|c| c.is_finite())
    }
}

/// Interval endpoint data shared by both fits
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Endpoints {
    /// Left domain endpoint
    pub left: f64,
    /// Right domain endpoint
    pub right: f64,
    /// CDF at the left endpoint
    pub cdf_left: f64,
    /// CDF at the right endpoint
    pub cdf_right: f64,
    /// Normalized density at the left endpoint
    pub density_left: f64,
    /// Normalized density at the right endpoint
    pub density_right: f64,
}

impl Endpoints {
    /// Probability mass between the endpoints
    pub fn cdf_width(&self) -> f64 {
        self.cdf_right - self.cdf_left
    }

    /// Average density over the interval, `(Fr - Fl) / (r - l)`
    pub fn mean_density(&self) -> f64 {
        self.cdf_width() / (self.right - self.left)
    }
}

/// Fit the inverse CDF on one interval
///
/// The slope of the inverse CDF is the reciprocal density, so both endpoint
/// densities must be strictly positive.
pub fn fit_inverse_cdf(ends: &Endpoints) -> HermiteCubic {
    let width = ends.right - ends.left;
    let mass = ends.cdf_width();
    let inv_left = 1.0 / ends.density_left;
    let inv_right = 1.0 / ends.density_right;

    HermiteCubic::from_coefficients([
        ends.left,
        mass * inv_left,
        mass.mul_add(-(2.0f64.mul_add(inv_left, inv_right)), 3.0 * width),
        mass.mul_add(inv_left + inv_right, -2.0 * width),
    ])
}

/// Straight line from `left` to `right` over the local CDF fraction
///
/// Used for intervals whose CDF width has collapsed to a few rounding steps,
/// where endpoint slopes carry no usable information.
pub fn fit_linear(ends: &Endpoints) -> HermiteCubic {
    HermiteCubic::from_coefficients([ends.left, ends.right - ends.left, 0.0, 0.0])
}

/// Fit the density along the inverse CDF on one interval
///
/// `slope_left` and `slope_right` are the logarithmic derivatives
/// `f'(x) / f(x)` at the endpoints, which is also `d f(F^-1(u)) / du`.
pub fn fit_density(ends: &Endpoints, slope_left: f64, slope_right: f64) -> HermiteCubic {
    let mass = ends.cdf_width();
    let rise = ends.density_right - ends.density_left;

    HermiteCubic::from_coefficients([
        ends.density_left,
        mass * slope_left,
        mass.mul_add(-(2.0f64.mul_add(slope_left, slope_right)), 3.0 * rise),
        mass.mul_add(slope_left + slope_right, -2.0 * rise),
    ])
}

/// Sufficient monotonicity condition for the inverse CDF cubic
///
/// The cubic is non-decreasing on `[0, 1]` when the mean density does not
/// exceed three times the density at either endpoint.
pub fn is_monotone(ends: &Endpoints) -> bool {
    let delta = ends.mean_density();
    delta <= 3.0 * ends.density_left && delta <= 3.0 * ends.density_right
}
