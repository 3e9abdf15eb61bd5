//! Single-solute solutions for direct pH lookups.

use crate::error::ChemResult;
use crate::solute::Solute;
use crate::solution::Solution;
use crate::water::WaterModel;
use ph_core::units::Temperature;
use std::sync::Arc;

// A lone solute makes up the whole mixture, so any non-zero volume gives a
// dilution proportion of one.
const UNIT_VOLUME: f64 = 1.0;

fn single_solute(
    solute: Solute,
    water: Option<(Arc<dyn WaterModel>, Temperature)>,
) -> ChemResult<Solution> {
    let mut solution = match water {
        Some((model, temperature)) => {
            Solution::with_water_model(vec![solute], model, temperature)?
        }
        None => Solution::new(vec![solute])?,
    };
    solution.set_volume(0, UNIT_VOLUME)?;
    Ok(solution)
}

/// Acid dissolved in water at its stock concentration.
#[derive(Debug, Clone)]
pub struct Acid {
    solution: Solution,
}

impl Acid {
    /// Acid at 25 °C from its dissociation constants (K, not pK).
    pub fn new(constants: &[f64], concentration: f64) -> ChemResult<Self> {
        let solution = single_solute(Solute::acid(constants, concentration)?, None)?;
        Ok(Self { solution })
    }

    pub fn with_temperature(
        constants: &[f64],
        concentration: f64,
        water_model: Arc<dyn WaterModel>,
        temperature: Temperature,
    ) -> ChemResult<Self> {
        let solution = single_solute(
            Solute::acid(constants, concentration)?,
            Some((water_model, temperature)),
        )?;
        Ok(Self { solution })
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn ph(&self) -> ChemResult<f64> {
        self.solution.solve_ph()
    }
}

/// Base dissolved in water at its stock concentration.
#[derive(Debug, Clone)]
pub struct Base {
    solution: Solution,
}

impl Base {
    /// Base at 25 °C from its dissociation constants (Kb, not pKb).
    pub fn new(constants: &[f64], concentration: f64) -> ChemResult<Self> {
        let solution = single_solute(Solute::base(constants, concentration)?, None)?;
        Ok(Self { solution })
    }

    pub fn with_temperature(
        constants: &[f64],
        concentration: f64,
        water_model: Arc<dyn WaterModel>,
        temperature: Temperature,
    ) -> ChemResult<Self> {
        let solution = single_solute(
            Solute::base(constants, concentration)?,
            Some((water_model, temperature)),
        )?;
        Ok(Self { solution })
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn ph(&self) -> ChemResult<f64> {
        self.solution.solve_ph()
    }
}

/// pH of an acid solution at 25 °C.
pub fn compute_acid_ph(constants: &[f64], concentration: f64) -> ChemResult<f64> {
    Acid::new(constants, concentration)?.ph()
}

/// pH of a base solution at 25 °C.
pub fn compute_base_ph(constants: &[f64], concentration: f64) -> ChemResult<f64> {
    Base::new(constants, concentration)?.ph()
}
