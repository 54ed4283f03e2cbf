use crate::algorithm::index::SearchIndex;
use crate::algorithm::refinement::refine;
use crate::density::Density;
use crate::io::configuration::{
    DEFAULT_MAX_INTERVALS, DEFAULT_TOLERANCE, MAX_INTERVAL_CDF_WIDTH, NUMERICAL_CDF_SAMPLES,
    SEARCH_TABLE_LENGTH,
};
use crate::io::error::{Result, SamplerError, invalid_parameter};
use crate::sampling::table::{Table, TableParts};

/// Parameters controlling table construction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildConfig {
    /// Absolute tolerance for the CDF and density fits at interval midpoints
    pub tolerance: f64,
    /// Largest CDF width an interval may keep before fitting starts
    pub max_cdf_width: f64,
    /// Subdivisions used by the midpoint rule
    pub quadrature_samples: usize,
    /// Number of buckets in the search index
    pub search_table_length: usize,
    /// Maximum number of intervals before giving up
    pub max_intervals: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_cdf_width: MAX_INTERVAL_CDF_WIDTH,
            quadrature_samples: NUMERICAL_CDF_SAMPLES,
            search_table_length: SEARCH_TABLE_LENGTH,
            max_intervals: DEFAULT_MAX_INTERVALS,
        }
    }
}

impl BuildConfig {
    /// Check every parameter
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid parameter
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(invalid_parameter(
                "tolerance",
                &self.tolerance,
                &"must be finite and strictly positive",
            ));
        }
        if !(self.max_cdf_width > 0.0 && self.max_cdf_width <= 1.0) {
            return Err(invalid_parameter(
                "max_cdf_width",
                &self.max_cdf_width,
                &"must lie in (0, 1]",
            ));
        }
        if self.quadrature_samples == 0 {
            return Err(invalid_parameter(
                "quadrature_samples",
                &self.quadrature_samples,
                &"at least one subdivision is required",
            ));
        }
        if self.search_table_length == 0 {
            return Err(invalid_parameter(
                "search_table_length",
                &self.search_table_length,
                &"the search index needs at least one bucket",
            ));
        }
        if self.max_intervals == 0 {
            return Err(invalid_parameter(
                "max_intervals",
                &self.max_intervals,
                &"at least one interval is required",
            ));
        }
        Ok(())
    }
}

/// Build an inversion table with default settings and the given tolerance
///
/// # Errors
///
/// See [`TableBuilder::build`]
pub fn build<D: Density + ?Sized>(density: &D, left: f64, right: f64, tolerance: f64) -> Result<Table> {
    TableBuilder::new(density, left, right)
        .tolerance(tolerance)
        .build()
}

/// Configures and runs the construction pipeline
///
/// Normalization, refinement, search index and final validation run in
/// sequence on the calling thread.
#[derive(Clone, Debug)]
pub struct TableBuilder<'a, D: ?Sized> {
    density: &'a D,
    left: f64,
    right: f64,
    config: BuildConfig,
}

impl<'a, D: Density + ?Sized> TableBuilder<'a, D> {
    /// Start building a table for `density` on `[left, right]`
    pub fn new(density: &'a D, left: f64, right: f64) -> Self {
        Self {
            density,
            left,
            right,
            config: BuildConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Absolute fit tolerance
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Largest CDF width per interval before fitting
    pub fn max_cdf_width(mut self, width: f64) -> Self {
        self.config.max_cdf_width = width;
        self
    }

    /// Midpoint-rule subdivisions
    pub fn quadrature_samples(mut self, samples: usize) -> Self {
        self.config.quadrature_samples = samples;
        self
    }

    /// Number of search index buckets
    pub fn search_table_length(mut self, length: usize) -> Self {
        self.config.search_table_length = length;
        self
    }

    /// Interval budget before construction fails with non-convergence
    pub fn max_intervals(mut self, limit: usize) -> Self {
        self.config.max_intervals = limit;
        self
    }

    /// Run the pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The domain is empty, reversed or not finite
    /// - A configuration parameter is invalid
    /// - The density returns NaN, infinite or negative values, or zero at an
    ///   interval endpoint
    /// - Interval storage cannot grow
    /// - Refinement exceeds the interval budget
    pub fn build(self) -> Result<Table> {
        if !self.left.is_finite() || !self.right.is_finite() || self.left >= self.right {
            return Err(SamplerError::InvalidDomain {
                left: self.left,
                right: self.right,
            });
        }
        self.config.validate()?;
        log::debug!(
            "building inversion table on [{}, {}] with tolerance {:e}",
            self.left,
            self.right,
            self.config.tolerance
        );

        let refinement = refine(self.density, self.left, self.right, &self.config)?;
        let index = SearchIndex::build(&refinement.intervals, self.config.search_table_length)?;

        let table = Table::from_parts(TableParts {
            left: self.left,
            right: self.right,
            norm: refinement.norm,
            tolerance: self.config.tolerance,
            intervals: refinement.intervals,
            index,
            density_fit: self.density.has_derivative(),
        })?;
        log::info!(
            "inversion table ready: {} intervals on [{}, {}]",
            table.intervals().len(),
            self.left,
            self.right
        );
        Ok(table)
    }
}
