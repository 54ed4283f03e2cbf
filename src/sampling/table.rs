//! Finished inversion table and its runtime queries
//!
//! A [`Table`] is immutable plain data once built. Queries neither allocate
//! nor mutate, so one table can serve any number of threads.

use rand::Rng;
use rand::distr::Distribution;

use crate::algorithm::index::SearchIndex;
use crate::io::configuration::MAX_UNIFORM;
use crate::io::error::{Result, SamplerError, invalid_table};
use crate::sampling::interval::Interval;

/// Complete exported state of a table
///
/// This is everything needed to rebuild a working sampler elsewhere, for
/// example from data embedded in another program.
#[derive(Clone, Debug, PartialEq)]
pub struct TableParts {
    /// Left domain endpoint
    pub left: f64,
    /// Right domain endpoint
    pub right: f64,
    /// Normalization constant of the density over the domain
    pub norm: f64,
    /// Tolerance the table was built with
    pub tolerance: f64,
    /// Intervals sorted by left CDF value
    pub intervals: Vec<Interval>,
    /// Search index over the sorted intervals
    pub index: SearchIndex,
    /// Whether the intervals carry density fits
    pub density_fit: bool,
}

/// Piecewise cubic approximation of an inverse CDF
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    left: f64,
    right: f64,
    norm: f64,
    tolerance: f64,
    intervals: Vec<Interval>,
    index: SearchIndex,
    density_fit: bool,
}

/// Map any input onto `[0, 1)`, NaN included
fn clamp_uniform(u: f64) -> f64 {
    if u.is_nan() {
        0.0
    } else {
        u.clamp(0.0, MAX_UNIFORM)
    }
}

impl Table {
    /// Rebuild a table from its parts, checking every table invariant
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is invalid or if the intervals or the
    /// index violate the tiling, ordering or range invariants
    pub fn from_parts(parts: TableParts) -> Result<Self> {
        validate(&parts)?;
        Ok(Self {
            left: parts.left,
            right: parts.right,
            norm: parts.norm,
            tolerance: parts.tolerance,
            intervals: parts.intervals,
            index: parts.index,
            density_fit: parts.density_fit,
        })
    }

    /// Decompose into exportable parts
    pub fn into_parts(self) -> TableParts {
        TableParts {
            left: self.left,
            right: self.right,
            norm: self.norm,
            tolerance: self.tolerance,
            intervals: self.intervals,
            index: self.index,
            density_fit: self.density_fit,
        }
    }

    /// Transform a uniform variate into a variate of the tabulated density
    ///
    /// `u` is clamped into `[0, 1)`; the result always lies in the domain.
    pub fn sample(&self, u: f64) -> f64 {
        let u = clamp_uniform(u);
        self.interval_for(u)
            .map_or(self.left, |interval| interval.quantile(u))
    }

    /// Interpolated normalized density at the variate `sample(u)`
    ///
    /// # Errors
    ///
    /// Returns an error if the table was built without a density derivative
    pub fn density(&self, u: f64) -> Result<f64> {
        self.sample_with_density(u).map(|(_, density)| density)
    }

    /// Variate and interpolated density for `u` with a single lookup
    ///
    /// # Errors
    ///
    /// Returns an error if the table was built without a density derivative
    pub fn sample_with_density(&self, u: f64) -> Result<(f64, f64)> {
        if !self.density_fit {
            return Err(SamplerError::QueryOnUnbuiltDensityTable);
        }
        let u = clamp_uniform(u);
        let interval = self
            .interval_for(u)
            .ok_or_else(|| invalid_table("table has no intervals"))?;
        Ok((interval.quantile(u), interval.density_at(u)))
    }

    /// Interval whose CDF range contains `u`
    ///
    /// Starts from the search index bucket of `u` and scans forward while
    /// the current interval ends below `u`.
    pub fn interval_for(&self, u: f64) -> Option<&Interval> {
        let last = self.intervals.len().checked_sub(1)?;
        let mut position = self.index.start_for(u).min(last);
        while position < last
            && self
                .intervals
                .get(position)
                .is_some_and(|interval| interval.cdf_right < u)
        {
            position += 1;
        }
        self.intervals.get(position)
    }

    /// Domain as `(left, right)`
    pub const fn domain(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    /// Normalization constant of the density over the domain
    pub const fn normalization(&self) -> f64 {
        self.norm
    }

    /// Tolerance the table was built with
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Intervals sorted by CDF
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Search index over the intervals
    pub const fn search_index(&self) -> &SearchIndex {
        &self.index
    }

    /// Whether [`Table::density`] is available
    pub const fn has_density_fit(&self) -> bool {
        self.density_fit
    }
}

impl Distribution<f64> for Table {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        Self::sample(self, rng.random::<f64>())
    }
}

fn validate(parts: &TableParts) -> Result<()> {
    if !parts.left.is_finite() || !parts.right.is_finite() || parts.left >= parts.right {
        return Err(SamplerError::InvalidDomain {
            left: parts.left,
            right: parts.right,
        });
    }
    if !parts.norm.is_finite() || parts.norm <= 0.0 {
        return Err(invalid_table(format!(
            "normalization {} must be finite and positive",
            parts.norm
        )));
    }
    if !parts.tolerance.is_finite() || parts.tolerance <= 0.0 {
        return Err(invalid_table(format!(
            "tolerance {} must be finite and positive",
            parts.tolerance
        )));
    }

    let (Some(first), Some(last)) = (parts.intervals.first(), parts.intervals.last()) else {
        return Err(invalid_table("table has no intervals"));
    };
    if first.left != parts.left || last.right != parts.right {
        return Err(invalid_table(format!(
            "intervals cover [{}, {}] instead of the domain [{}, {}]",
            first.left, last.right, parts.left, parts.right
        )));
    }
    if first.cdf_left != 0.0 || last.cdf_right != 1.0 {
        return Err(invalid_table(format!(
            "intervals cover CDF range [{}, {}] instead of [0, 1]",
            first.cdf_left, last.cdf_right
        )));
    }

    for (position, interval) in parts.intervals.iter().enumerate() {
        if interval.left.partial_cmp(&interval.right) != Some(std::cmp::Ordering::Less) {
            return Err(invalid_table(format!(
                "interval {position} has an empty domain range [{}, {}]",
                interval.left, interval.right
            )));
        }
        if !(0.0 <= interval.cdf_left
            && interval.cdf_left <= interval.cdf_right
            && interval.cdf_right <= 1.0)
        {
            return Err(invalid_table(format!(
                "interval {position} has CDF range [{}, {}] outside [0, 1] or reversed",
                interval.cdf_left, interval.cdf_right
            )));
        }
        if !interval.inverse_cdf.is_finite() || !interval.density.is_finite() {
            return Err(invalid_table(format!(
                "interval {position} has non-finite coefficients"
            )));
        }
    }

    for (position, pair) in parts.intervals.windows(2).enumerate() {
        if let [current, next] = pair {
            if current.right != next.left || current.cdf_right != next.cdf_left {
                return Err(invalid_table(format!(
                    "intervals {position} and {} do not tile: [{}, {}] / F [{}, {}] meets [{}, {}] / F [{}, {}]",
                    position + 1,
                    current.left,
                    current.right,
                    current.cdf_left,
                    current.cdf_right,
                    next.left,
                    next.right,
                    next.cdf_left,
                    next.cdf_right
                )));
            }
        }
    }

    let starts = parts.index.starts();
    if starts.is_empty() {
        return Err(invalid_table("search index has no buckets"));
    }
    if let Some(start) = starts.iter().find(|&&start| start >= parts.intervals.len()) {
        return Err(invalid_table(format!(
            "search index entry {start} exceeds {} intervals",
            parts.intervals.len()
        )));
    }
    if starts.windows(2).any(|pair| matches!(pair, [a, b] if a > b)) {
        return Err(invalid_table("search index is not monotone"));
    }

    Ok(())
}
