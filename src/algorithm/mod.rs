/// Append-only interval storage with stable identifiers and link traversal
pub mod arena;
/// Construction pipeline and its configuration
pub mod builder;
/// Coarse CDF bucket index for fast interval lookup
pub mod index;
/// Two-phase adaptive interval refinement
pub mod refinement;
