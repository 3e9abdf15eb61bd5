//! Error types for titration operations.

use ph_chem::ChemError;
use thiserror::Error;

/// Errors encountered while sweeping a titration.
#[derive(Error, Debug)]
pub enum TitrationError {
    #[error("Expected {expected} fixed volume(s), got {found}")]
    FixedVolumeCountMismatch { expected: usize, found: usize },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Sample {index} at volume {volume} failed: {source}")]
    SampleFailed {
        index: usize,
        volume: f64,
        #[source]
        source: ChemError,
    },

    #[error("Chemistry error: {0}")]
    Chem(#[from] ChemError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TitrationResult<T> = Result<T, TitrationError>;
