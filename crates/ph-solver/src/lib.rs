//! Bracketed scalar root-finding for equilibrium problems.
//!
//! This crate provides Brent's method for a single unknown inside an interval
//! whose endpoints give residuals of opposite sign. The residual closure may
//! fail with the caller's own error type, which is propagated unchanged.

pub mod brent;
pub mod error;

pub use brent::{Bracket, BrentConfig, BrentResult, brent_solve};
pub use error::{SolverError, SolverResult};
