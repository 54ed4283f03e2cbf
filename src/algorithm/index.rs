//! Coarse search index over evenly spaced CDF buckets
//!
//! Bucket `i` covers uniform values from `i / length` upward and stores the
//! sorted position of the last interval ending strictly below `i / length`.
//! A lookup starts there and scans forward, so the scan length is bounded
//! by the number of intervals inside one bucket.

use crate::io::error::{Result, invalid_parameter};
use crate::sampling::interval::Interval;

/// Starting positions for the interval scan, one per bucket
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchIndex {
    starts: Vec<usize>,
}

impl SearchIndex {
    /// Build an index with `length` buckets over intervals sorted by CDF
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is zero
    pub fn build(intervals: &[Interval], length: usize) -> Result<Self> {
        if length == 0 {
            return Err(invalid_parameter(
                "search_table_length",
                &length,
                &"the search index needs at least one bucket",
            ));
        }

        let starts = (0..length)
            .map(|bucket| {
                let u = bucket as f64 / length as f64;
                intervals
                    .partition_point(|interval| interval.cdf_right < u)
                    .saturating_sub(1)
            })
            .collect();

        Ok(Self { starts })
    }

    /// Wrap previously computed starting positions
    pub const fn from_starts(starts: Vec<usize>) -> Self {
        Self { starts }
    }

    /// Starting positions, one per bucket
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Whether the index has no buckets
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Bucket holding the uniform value `u` in `[0, 1)`
    pub fn bucket(&self, u: f64) -> usize {
        let last = self.starts.len().saturating_sub(1);
        ((u * self.starts.len() as f64) as usize).min(last)
    }

    /// Scan start for the uniform value `u` in `[0, 1)`
    pub fn start_for(&self, u: f64) -> usize {
        self.starts.get(self.bucket(u)).copied().unwrap_or(0)
    }
}
