//! Reference constants and construction defaults

/// Number of buckets in the coarse search index
pub const SEARCH_TABLE_LENGTH: usize = 100;

/// Number of equal-width subdivisions used by the midpoint rule
pub const NUMERICAL_CDF_SAMPLES: usize = 1000;

/// Largest CDF width an interval may keep after the coverage phase, which
/// bounds the probability mass of every interval before fitting starts
pub const MAX_INTERVAL_CDF_WIDTH: f64 = 0.05;

/// Default absolute tolerance for the Hermite fits
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default maximum number of intervals a table may hold before refinement
/// gives up on a density that never satisfies the accuracy checks
pub const DEFAULT_MAX_INTERVALS: usize = 100_000;

/// CDF width at or below which an interval counts as collapsed
///
/// Near `F = 1` the CDF is quantized to steps of `EPSILON / 2`, so far-tail
/// intervals keep a width of a few steps however little mass they hold.
/// Such intervals get a linear inverse CDF instead of a Hermite fit.
pub const COLLAPSED_CDF_WIDTH: f64 = 4.0 * f64::EPSILON;

/// Largest double strictly below one, the upper clamp for uniform variates
pub const MAX_UNIFORM: f64 = 1.0 - f64::EPSILON / 2.0;
