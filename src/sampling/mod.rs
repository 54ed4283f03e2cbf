/// Interval records and their cubic evaluation
pub mod interval;
/// Finished table, validation and runtime queries
pub mod table;
