//! Error types for table construction, reconstruction and queries

use std::collections::TryReserveError;
use std::fmt;

use crate::algorithm::refinement::RefinementPhase;

/// Main error type for all sampler operations
#[derive(Debug)]
pub enum SamplerError {
    /// Domain bounds are not a finite, non-empty range
    InvalidDomain {
        /// Requested left endpoint
        left: f64,
        /// Requested right endpoint
        right: f64,
    },

    /// Construction or density parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// The density callable produced an unusable value
    ///
    /// Raised for NaN, infinite or negative densities anywhere they are
    /// sampled, for non-finite derivatives, and for zero densities at an
    /// interval endpoint where the value is used as a divisor.
    Density {
        /// Abscissa at which the density was evaluated
        x: f64,
        /// Value the density (or its derivative) returned
        value: f64,
        /// What is wrong with the value
        reason: &'static str,
    },

    /// Interval storage could not grow while splitting
    ResourceExhausted {
        /// Number of intervals held when the allocation failed
        intervals: usize,
        /// Underlying allocation failure
        source: TryReserveError,
    },

    /// Refinement did not settle within the configured interval budget
    NonConvergence {
        /// Refinement phase that was running
        phase: RefinementPhase,
        /// Intervals created before giving up
        intervals: usize,
        /// Configured maximum interval count
        limit: usize,
    },

    /// Density lookup on a table built without a derivative
    QueryOnUnbuiltDensityTable,

    /// Reconstructed table state violates a table invariant
    InvalidTable {
        /// Description of the violated invariant
        reason: String,
    },
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { left, right } => {
                write!(
                    f,
                    "Invalid domain [{left}, {right}]: bounds must be finite with left < right"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Density { x, value, reason } => {
                write!(f, "Density error at x = {x}: got {value}, {reason}")
            }
            Self::ResourceExhausted { intervals, source } => {
                write!(
                    f,
                    "Failed to grow interval storage beyond {intervals} intervals: {source}"
                )
            }
            Self::NonConvergence {
                phase,
                intervals,
                limit,
            } => {
                write!(
                    f,
                    "Refinement did not converge during {phase} phase ({intervals} intervals, limit {limit})"
                )
            }
            Self::QueryOnUnbuiltDensityTable => {
                write!(
                    f,
                    "Density lookup requires a table built with a density derivative"
                )
            }
            Self::InvalidTable { reason } => {
                write!(f, "Invalid table: {reason}")
            }
        }
    }
}

impl std::error::Error for SamplerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ResourceExhausted { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for sampler results
pub type Result<T> = std::result::Result<T, SamplerError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SamplerError {
    SamplerError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a density error
pub const fn density_error(x: f64, value: f64, reason: &'static str) -> SamplerError {
    SamplerError::Density { x, value, reason }
}

/// Create an invalid table error
pub fn invalid_table(reason: impl Into<String>) -> SamplerError {
    SamplerError::InvalidTable {
        reason: reason.into(),
    }
}
