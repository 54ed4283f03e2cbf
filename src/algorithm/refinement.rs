//! Adaptive partitioning of the domain into Hermite-fittable intervals
//!
//! Refinement runs in two passes over the linked interval chain. The
//! coverage pass halves every interval holding more than the configured CDF
//! width. The accuracy pass fits the Hermite cubics and halves every
//! interval whose fit misses the tolerance at its CDF midpoint or whose
//! inverse-CDF cubic may decrease. A split always re-examines the left half
//! before moving on, so both passes end at the rightmost interval.
//!
//! Far-tail intervals whose CDF width has collapsed to rounding noise are
//! fitted linearly and accepted as they are.

use std::fmt;

use crate::algorithm::arena::{IntervalArena, Node};
use crate::algorithm::builder::BuildConfig;
use crate::density::{Density, checked_derivative, checked_value};
use crate::io::configuration::COLLAPSED_CDF_WIDTH;
use crate::io::error::{Result, SamplerError, density_error, invalid_table};
use crate::math::hermite::{HermiteCubic, fit_density, fit_inverse_cdf, fit_linear, is_monotone};
use crate::math::quadrature::MidpointRule;
use crate::sampling::interval::{Interval, IntervalId};

/// Refinement pass, reported when a pass fails to settle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefinementPhase {
    /// Bounding the CDF width of every interval
    Coverage,
    /// Meeting the tolerance and the monotonicity condition
    Accuracy,
}

impl fmt::Display for RefinementPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coverage => write!(f, "coverage"),
            Self::Accuracy => write!(f, "accuracy"),
        }
    }
}

/// Fit quality of one interval
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitReport {
    /// Absolute CDF error at the CDF midpoint
    pub cdf_error: f64,
    /// Absolute density error at the CDF midpoint, zero without a derivative
    pub density_error: f64,
    /// Whether the inverse-CDF cubic is guaranteed non-decreasing
    pub monotone: bool,
}

impl FitReport {
    /// Whether the fit satisfies `tolerance`
    pub fn accepts(&self, tolerance: f64) -> bool {
        self.monotone && self.cdf_error <= tolerance && self.density_error <= tolerance
    }
}

/// Sorted intervals together with the normalization they were built with
#[derive(Clone, Debug)]
pub struct Refinement {
    /// Constant such that `norm * integral(f) = 1` over the domain
    pub norm: f64,
    /// Intervals sorted by left CDF value
    pub intervals: Vec<Interval>,
}

/// Partition `[left, right]` until every interval meets `config`
///
/// # Errors
///
/// Returns an error if the density misbehaves anywhere it is sampled, if
/// storage cannot grow, or if refinement exceeds the interval limit
pub fn refine<D: Density + ?Sized>(
    density: &D,
    left: f64,
    right: f64,
    config: &BuildConfig,
) -> Result<Refinement> {
    let mut refiner = Refiner::new(density, left, right, config)?;
    refiner.cover()?;
    refiner.fit_all()?;
    Ok(refiner.finish())
}

/// Single-threaded refinement state over one interval arena
pub struct Refiner<'a, D: ?Sized> {
    density: &'a D,
    quadrature: MidpointRule,
    config: &'a BuildConfig,
    norm: f64,
    fit_density: bool,
    arena: IntervalArena,
}

impl<'a, D: Density + ?Sized> Refiner<'a, D> {
    /// Normalize the density and start from one interval covering the domain
    ///
    /// # Errors
    ///
    /// Returns an error if the density has no usable mass on the domain
    pub fn new(density: &'a D, left: f64, right: f64, config: &'a BuildConfig) -> Result<Self> {
        let quadrature = MidpointRule::new(config.quadrature_samples)?;
        let mass = quadrature.integrate(density, left, right)?;
        if !mass.is_finite() || mass <= 0.0 {
            return Err(density_error(
                left,
                mass,
                "density must integrate to a finite positive mass over the domain",
            ));
        }
        let norm = 1.0 / mass;
        log::debug!("normalization over [{left}, {right}]: total mass {mass:e}, norm {norm:e}");

        Ok(Self {
            density,
            quadrature,
            config,
            norm,
            fit_density: density.has_derivative(),
            arena: IntervalArena::covering(left, right, mass)?,
        })
    }

    /// Normalization constant
    pub const fn norm(&self) -> f64 {
        self.norm
    }

    /// Intervals created so far
    pub const fn arena(&self) -> &IntervalArena {
        &self.arena
    }

    /// Halve intervals until none exceeds the configured CDF width
    ///
    /// # Errors
    ///
    /// Returns an error if a split fails
    pub fn cover(&mut self) -> Result<()> {
        let mut cursor = self.arena.head();
        loop {
            let node = self.node(cursor)?;
            if node.interval.cdf_width() > self.config.max_cdf_width {
                self.split(cursor, RefinementPhase::Coverage)?;
                continue;
            }
            match node.next {
                Some(next) => cursor = next,
                None => break,
            }
        }
        log::debug!("coverage phase finished with {} intervals", self.arena.len());
        Ok(())
    }

    /// Fit every interval, halving those that fail the accuracy checks
    ///
    /// # Errors
    ///
    /// Returns an error if the density misbehaves or a split fails
    pub fn fit_all(&mut self) -> Result<()> {
        let mut cursor = self.arena.head();
        loop {
            let report = self.fit(cursor)?;
            if !report.accepts(self.config.tolerance) {
                log::trace!(
                    "interval {cursor} rejected: cdf error {:e}, density error {:e}, monotone {}",
                    report.cdf_error,
                    report.density_error,
                    report.monotone
                );
                self.split(cursor, RefinementPhase::Accuracy)?;
                continue;
            }
            match self.node(cursor)?.next {
                Some(next) => cursor = next,
                None => break,
            }
        }
        log::debug!("accuracy phase finished with {} intervals", self.arena.len());
        Ok(())
    }

    /// Compute both Hermite fits for `id` and measure them
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint density is not strictly positive, is
    /// so small that its reciprocal overflows, or the density misbehaves
    /// during the error estimate
    pub fn fit(&mut self, id: IntervalId) -> Result<FitReport> {
        let node = self.node(id)?;
        let interval = node.interval;

        let raw_left = self.endpoint_density(interval.left)?;
        let raw_right = self.endpoint_density(interval.right)?;
        let ends = interval.endpoints(self.norm * raw_left, self.norm * raw_right);

        // Collapsed intervals are only reached at their CDF endpoints, so a
        // linear inverse keeps them monotone without any accuracy check
        let collapsed = interval.cdf_width() <= COLLAPSED_CDF_WIDTH;
        let inverse_cdf = if collapsed {
            fit_linear(&ends)
        } else {
            fit_inverse_cdf(&ends)
        };
        let monotone = collapsed || is_monotone(&ends);
        let midpoint = inverse_cdf.evaluate(0.5);
        let inside = (interval.left..=interval.right).contains(&midpoint);

        let cdf_error = if collapsed {
            0.0
        } else if inside {
            if node.mass <= 0.0 {
                return Err(density_error(
                    interval.left,
                    node.mass,
                    "interval carries no probability mass",
                ));
            }
            let partial = self.quadrature.integrate(self.density, interval.left, midpoint)?;
            let cdf = (partial / node.mass).mul_add(interval.cdf_width(), interval.cdf_left);
            (cdf - 0.5 * (interval.cdf_left + interval.cdf_right)).abs()
        } else {
            f64::INFINITY
        };

        let (density, density_error) = if self.fit_density {
            let slope_left = checked_derivative(self.density, interval.left)? / raw_left;
            let slope_right = checked_derivative(self.density, interval.right)? / raw_right;
            let fit = fit_density(&ends, slope_left, slope_right);
            let error = if collapsed {
                0.0
            } else if inside {
                let exact = self.norm * checked_value(self.density, midpoint)?;
                (exact - fit.evaluate(0.5)).abs()
            } else {
                f64::INFINITY
            };
            (fit, error)
        } else {
            (HermiteCubic::zero(), 0.0)
        };

        let slot = self
            .arena
            .get_mut(id)
            .ok_or_else(|| invalid_table(format!("interval {id} is not in the arena")))?;
        slot.interval.inverse_cdf = inverse_cdf;
        slot.interval.density = density;

        Ok(FitReport {
            cdf_error,
            density_error,
            monotone,
        })
    }

    /// Halve `id` at its domain midpoint
    ///
    /// The midpoint CDF splits the parent's CDF range in proportion to the
    /// integrated mass of the two halves, so the children tile the parent
    /// exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval limit is reached, the midpoint is not
    /// representable, the halves carry no mass, or storage cannot grow
    pub fn split(&mut self, id: IntervalId, phase: RefinementPhase) -> Result<IntervalId> {
        if self.arena.len() >= self.config.max_intervals {
            log::warn!(
                "{phase} phase reached the limit of {} intervals",
                self.config.max_intervals
            );
            return Err(self.non_convergence(phase));
        }

        let node = self.node(id)?;
        let interval = node.interval;
        let midpoint = 0.5f64.mul_add(interval.right - interval.left, interval.left);
        if midpoint <= interval.left || midpoint >= interval.right {
            log::warn!(
                "{phase} phase cannot halve [{}, {}] any further",
                interval.left,
                interval.right
            );
            return Err(self.non_convergence(phase));
        }

        let left_mass = self.quadrature.integrate(self.density, interval.left, midpoint)?;
        let right_mass = self.quadrature.integrate(self.density, midpoint, interval.right)?;
        let total = left_mass + right_mass;
        if total <= 0.0 {
            return Err(density_error(
                interval.left,
                total,
                "interval carries no probability mass",
            ));
        }
        let cdf_midpoint = (left_mass / total)
            .mul_add(interval.cdf_width(), interval.cdf_left)
            .clamp(interval.cdf_left, interval.cdf_right);

        let new_id = self
            .arena
            .split(id, midpoint, cdf_midpoint, left_mass, right_mass)?;
        log::trace!("split {id} at x = {midpoint:e} (F = {cdf_midpoint:e}), new interval {new_id}");
        Ok(new_id)
    }

    /// Consume the refiner into sorted intervals
    pub fn finish(self) -> Refinement {
        Refinement {
            norm: self.norm,
            intervals: self.arena.into_sorted(),
        }
    }

    fn node(&self, id: IntervalId) -> Result<Node> {
        self.arena
            .get(id)
            .copied()
            .ok_or_else(|| invalid_table(format!("interval {id} is not in the arena")))
    }

    // Unnormalized endpoint density; its normalized reciprocal is the
    // inverse-CDF slope and must stay finite
    fn endpoint_density(&self, x: f64) -> Result<f64> {
        let value = checked_value(self.density, x)?;
        if value <= 0.0 || self.norm * value <= 0.0 {
            return Err(density_error(
                x,
                value,
                "density must be strictly positive at interval endpoints",
            ));
        }
        if !(1.0 / (self.norm * value)).is_finite() {
            return Err(density_error(
                x,
                value,
                "density at an interval endpoint underflows the inverse-CDF slope",
            ));
        }
        Ok(value)
    }

    fn non_convergence(&self, phase: RefinementPhase) -> SamplerError {
        SamplerError::NonConvergence {
            phase,
            intervals: self.arena.len(),
            limit: self.config.max_intervals,
        }
    }
}
