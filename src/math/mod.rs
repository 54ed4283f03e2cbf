//! Numeric primitives for table construction

/// Cubic Hermite fits of the inverse CDF and the density
pub mod hermite;
/// Error function and normal CDF used by reference densities
pub mod probability;
/// Fixed-resolution midpoint integration of densities
pub mod quadrature;
