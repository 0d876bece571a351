//! Model error types

use thiserror::Error;

/// Result type for model calculations
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Errors that can surface from the calculation core
///
/// Out-of-range periods never error; they resolve to zero, the last schedule
/// value, or a sentinel. Only inputs that make a formula undefined land here.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Assumption set makes a formula mathematically undefined
    #[error("Invalid assumptions: {0}")]
    InvalidAssumptions(String),

    /// Funding round would divide by zero or wipe out existing holders
    #[error("Degenerate dilution: {0}")]
    DegenerateDilution(String),

    /// Exit return math with a zero or negative investment
    #[error("Degenerate returns: {0}")]
    DegenerateReturns(String),

    /// Assumption file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Assumption file is not valid CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Assumption value could not be parsed
    #[error("Parse error for {key}: {value}")]
    Parse { key: String, value: String },
}
