//! ph-chem: acid-base equilibrium of aqueous mixtures.
//!
//! Provides:
//! - `Solute`: polyprotic acid or base with step-wise dissociation constants
//! - `WaterModel`: temperature-dependent ion product of water (Kw)
//! - `VolumeState`: per-solute stock volumes of a mixture
//! - `Solution`: charge balance and its root, the equilibrium pH
//! - `Acid` / `Base`: single-solute shortcuts
//!
//! Concentrations are treated as activities; no ionic-strength correction is
//! applied.
//!
//! # Example
//!
//! ```
//! use ph_chem::{Solute, Solution, compute_acid_ph};
//!
//! let ph = compute_acid_ph(&[1.8e-5], 0.1).unwrap();
//! assert!((ph - 2.87).abs() < 0.02);
//!
//! // 10 mL of 0.1 M acetic acid with 5 mL of 0.1 M NaOH
//! let mut solution = Solution::new(vec![
//!     Solute::base(vec![1e8], 0.1).unwrap(),
//!     Solute::acid(vec![1.8e-5], 0.1).unwrap(),
//! ])
//! .unwrap();
//! solution.set_volume(0, 5.0).unwrap();
//! solution.set_volume(1, 10.0).unwrap();
//! let ph = solution.solve_ph().unwrap();
//! assert!((ph - 4.74).abs() < 0.02);
//! ```

pub mod acid_base;
pub mod error;
pub mod solute;
pub mod solution;
pub mod volumes;
pub mod water;

// Re-exports for ergonomics
pub use acid_base::{Acid, Base, compute_acid_ph, compute_base_ph};
pub use error::{ChemError, ChemResult};
pub use solute::{Solute, SoluteKind};
pub use solution::Solution;
pub use volumes::VolumeState;
pub use water::{FixedIonProduct, HarnedOwen, STANDARD_KW, WaterModel, standard_water};
