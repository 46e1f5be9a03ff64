//! Evaluation boundary error types.

use thiserror::Error;

/// A request or result bundle holding values the evaluator does not allow.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoundaryError {
    /// A numeric field outside its permitted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The student submitted nothing but whitespace.
    #[error("pseudocode cannot be empty")]
    EmptyPseudocode,

    /// A string that names no known complexity class.
    #[error("unknown complexity class `{found}`")]
    UnknownComplexity { found: String },
}

/// Checks that `value` lies in `min..=max`.
pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), BoundaryError> {
    // NaN fails both comparisons and is rejected
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(BoundaryError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
