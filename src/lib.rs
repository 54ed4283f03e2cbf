//! Fast numerical inversion sampling from arbitrary univariate densities
//!
//! A table approximates the inverse CDF of a possibly unnormalized density
//! on a bounded domain by cubic Hermite pieces, refined adaptively until
//! every piece meets a tolerance and is monotone. Once built, transforming a
//! uniform variate costs one bucket lookup, a short scan and a cubic.
//!
//! ```
//! use invtable::density::reference::TruncatedNormal;
//! use invtable::algorithm::builder::build;
//!
//! let normal = TruncatedNormal::new(0.0, 1.0, -5.0, 5.0)?;
//! let table = build(&normal, -5.0, 5.0, 1e-6)?;
//! let median = table.sample(0.5);
//! assert!(median.abs() < 1e-3);
//! # Ok::<(), invtable::SamplerError>(())
//! ```

#![forbid(unsafe_code)]

/// Interval arena, refinement, search index and the construction pipeline
pub mod algorithm;
/// Density capability and reference densities
pub mod density;
/// Error handling and construction defaults
pub mod io;
/// Quadrature, Hermite fits and probability helpers
pub mod math;
/// Finished tables and runtime sampling
pub mod sampling;

pub use algorithm::builder::{BuildConfig, TableBuilder, build};
pub use density::{Density, FnDensity};
pub use io::error::{Result, SamplerError};
pub use sampling::table::{Table, TableParts};

#[cfg(test)]
#[path = "../tests/unit/mod.rs"]
mod unit;
