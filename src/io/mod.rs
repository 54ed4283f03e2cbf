//! Error handling and construction defaults

/// Reference constants and construction defaults
pub mod configuration;
/// Error types and helpers
pub mod error;
