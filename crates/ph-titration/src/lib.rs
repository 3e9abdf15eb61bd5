//! ph-titration: titration curves over acid-base mixtures.
//!
//! Provides:
//! - `Titration`: a solution with one titrant swept from zero volume upward
//! - `TitrationCurve`: sampled (volume, pH) points with equivalence markers
//! - `sample_volumes`: evenly spaced sweep volumes with an exact endpoint
//! - CSV / JSON export of curves
//!
//! Sweeps can run sequentially or on the rayon thread pool; both produce the
//! same curve.

pub mod curve;
pub mod error;
pub mod export;
pub mod sampling;
pub mod titration;

// Re-exports for ergonomics
pub use curve::{CurvePoint, EquivalenceMarkers, SteepRegion, TitrationCurve};
pub use error::{TitrationError, TitrationResult};
pub use export::{to_csv_string, to_json, write_csv};
pub use sampling::{DEFAULT_SAMPLE_COUNT, sample_volumes};
pub use titration::{Titration, TitrationOptions};
