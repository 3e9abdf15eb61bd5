//! ph-core: shared foundation for phflow.
//!
//! Contains:
//! - units (uom temperature type + constructors)
//! - numeric (Real, tolerances, pH/pK conversions)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PhError, PhResult};
pub use numeric::*;
pub use units::*;
