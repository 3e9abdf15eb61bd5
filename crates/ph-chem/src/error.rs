//! Equilibrium-chemistry errors.

use ph_core::PhError;
use ph_solver::SolverError;
use thiserror::Error;

/// Result type for equilibrium operations.
pub type ChemResult<T> = Result<T, ChemError>;

/// Errors that can occur while building a solution or solving for its pH.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChemError {
    /// A dissociation constant or concentration that is not strictly positive.
    #[error("Non-positive {what}: {value}")]
    NonPositiveConstant { what: &'static str, value: f64 },

    /// A solute declared without any dissociation step.
    #[error("Solute has no dissociation constants")]
    NoConstants,

    /// Charge requested while the mixture has no volume.
    #[error("Undefined dilution: total volume is {total_volume}")]
    UndefinedDilution { total_volume: f64 },

    /// Charge balance does not change sign over the pH bracket.
    #[error("No pH root in [{lower}, {upper}]")]
    NoRootInRange { lower: f64, upper: f64 },

    /// Root finder hit its iteration limit.
    #[error("pH solve did not converge after {iterations} iterations")]
    ConvergenceFailed { iterations: usize },

    /// A volume assignment below zero.
    #[error("Negative volume for solute {index}: {volume}")]
    NegativeVolume { index: usize, volume: f64 },

    /// Solute index outside the solution.
    #[error("Solute index {index} out of range (len={len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Volume state built for a different number of solutes.
    #[error("Volume count mismatch: expected {expected}, found {found}")]
    VolumeCountMismatch { expected: usize, found: usize },

    /// Value outside the validity range of a model.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Non-finite intermediate value.
    #[error(transparent)]
    Core(#[from] PhError),
}

impl From<SolverError> for ChemError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::NoSignChange { lower, upper, .. } => {
                ChemError::NoRootInRange { lower, upper }
            }
            SolverError::InvalidBracket { .. } => ChemError::InvalidArg {
                what: "pH bracket must be finite with lower < upper",
            },
            SolverError::ConvergenceFailed { iterations, .. } => {
                ChemError::ConvergenceFailed { iterations }
            }
            SolverError::NonFinite { value, .. } => ChemError::Core(PhError::NonFinite {
                what: "charge balance",
                value,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ChemError::NonPositiveConstant {
            what: "dissociation constant",
            value: -1.0,
        };
        assert!(err.to_string().contains("dissociation constant"));

        let err = ChemError::UndefinedDilution { total_volume: 0.0 };
        assert!(err.to_string().contains("total volume"));
    }

    #[test]
    fn solver_error_maps_to_no_root() {
        let err: ChemError = SolverError::NoSignChange {
            lower: -2.0,
            upper: 16.0,
            f_lower: 1.0,
            f_upper: 1.0,
        }
        .into();
        assert_eq!(
            err,
            ChemError::NoRootInRange {
                lower: -2.0,
                upper: 16.0
            }
        );
    }

    #[test]
    fn bad_bracket_is_a_configuration_error() {
        let err: ChemError = SolverError::InvalidBracket {
            lower: 16.0,
            upper: -2.0,
        }
        .into();
        assert!(matches!(err, ChemError::InvalidArg { .. }));
    }
}
