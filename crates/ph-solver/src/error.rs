//! Error types for solver operations.

use thiserror::Error;

/// Errors that can occur while bracketing or converging a root.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid bracket: [{lower}, {upper}]")]
    InvalidBracket { lower: f64, upper: f64 },

    #[error(
        "No sign change over [{lower}, {upper}] (f(lower) = {f_lower:e}, f(upper) = {f_upper:e})"
    )]
    NoSignChange {
        lower: f64,
        upper: f64,
        f_lower: f64,
        f_upper: f64,
    },

    #[error("Convergence failed after {iterations} iterations (last x = {last_x})")]
    ConvergenceFailed { iterations: usize, last_x: f64 },

    #[error("Non-finite residual {value} at x = {x}")]
    NonFinite { x: f64, value: f64 },
}

pub type SolverResult<T> = Result<T, SolverError>;
