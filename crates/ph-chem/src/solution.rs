//! Aqueous mixture of solutes, its charge balance and equilibrium pH.

use crate::error::{ChemError, ChemResult};
use crate::solute::{Solute, SoluteKind};
use crate::volumes::VolumeState;
use crate::water::{WaterModel, standard_water};
use ph_core::ph_to_concentration;
use ph_core::units::{Temperature, constants::standard_temperature};
use ph_solver::{BrentConfig, brent_solve};
use std::sync::Arc;
use tracing::debug;

/// A fixed set of solutes mixed in water.
///
/// The solution owns a [`VolumeState`] for the stateful API
/// (`set_volume` / `solve_ph`). The `*_with` methods evaluate against an
/// explicit volume state and never touch `self`, so many volume assignments
/// can be solved concurrently.
#[derive(Debug, Clone)]
pub struct Solution {
    solutes: Vec<Solute>,
    temperature: Temperature,
    water_model: Arc<dyn WaterModel>,
    kw: f64,
    volumes: VolumeState,
    solver: BrentConfig,
}

impl Solution {
    /// Solution at 25 °C with Kw = 1e-14.
    pub fn new(solutes: Vec<Solute>) -> ChemResult<Self> {
        Self::with_water_model(solutes, standard_water(), standard_temperature())
    }

    pub fn with_water_model(
        solutes: Vec<Solute>,
        water_model: Arc<dyn WaterModel>,
        temperature: Temperature,
    ) -> ChemResult<Self> {
        if solutes.is_empty() {
            return Err(ChemError::InvalidArg {
                what: "solution needs at least one solute",
            });
        }
        let kw = water_model.kw(temperature)?;
        let volumes = VolumeState::zeros(solutes.len());
        Ok(Self {
            solutes,
            temperature,
            water_model,
            kw,
            volumes,
            solver: BrentConfig::default(),
        })
    }

    /// Override bracket, tolerances or iteration limit of the pH solve.
    pub fn with_solver_config(mut self, solver: BrentConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn solutes(&self) -> &[Solute] {
        &self.solutes
    }

    pub fn solute(&self, index: usize) -> ChemResult<&Solute> {
        self.solutes.get(index).ok_or(ChemError::IndexOutOfRange {
            index,
            len: self.solutes.len(),
        })
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Current ion product of water.
    pub fn kw(&self) -> f64 {
        self.kw
    }

    pub fn water_model(&self) -> &dyn WaterModel {
        self.water_model.as_ref()
    }

    pub fn volumes(&self) -> &VolumeState {
        &self.volumes
    }

    pub fn total_volume(&self) -> f64 {
        self.volumes.total()
    }

    pub fn solver_config(&self) -> &BrentConfig {
        &self.solver
    }

    /// Change the temperature and refresh Kw. Does not re-solve.
    pub fn set_temperature(&mut self, temperature: Temperature) -> ChemResult<()> {
        self.kw = self.water_model.kw(temperature)?;
        self.temperature = temperature;
        Ok(())
    }

    /// Assign one solute's stock volume; the total is refreshed immediately.
    pub fn set_volume(&mut self, index: usize, volume: f64) -> ChemResult<()> {
        self.volumes.set_volume(index, volume)
    }

    /// Replace every volume at once.
    pub fn set_volumes(&mut self, volumes: VolumeState) -> ChemResult<()> {
        self.check_volumes(&volumes)?;
        self.volumes = volumes;
        Ok(())
    }

    pub fn recompute_total_volume(&mut self) -> f64 {
        self.volumes.recompute_total_volume()
    }

    /// Charge contribution of one solute under the given volumes.
    pub fn solute_charge(&self, volumes: &VolumeState, index: usize, ph: f64) -> ChemResult<f64> {
        let solute = self.solute(index)?;
        let proportion = volumes.proportion(index)?;
        Ok(solute.charge(ph, self.kw, proportion))
    }

    /// `[H+] - [OH-] - sum(acid charges) + sum(base charges)` at `ph`.
    pub fn evaluate_charge_balance(&self, volumes: &VolumeState, ph: f64) -> ChemResult<f64> {
        self.check_volumes(volumes)?;
        let h = ph_to_concentration(ph);
        let oh = self.kw / h;
        let mut balance = h - oh;
        for (index, solute) in self.solutes.iter().enumerate() {
            let q = solute.charge(ph, self.kw, volumes.proportion(index)?);
            match solute.kind() {
                SoluteKind::Acid => balance -= q,
                SoluteKind::Base => balance += q,
            }
        }
        Ok(balance)
    }

    pub fn charge_balance(&self, ph: f64) -> ChemResult<f64> {
        self.evaluate_charge_balance(&self.volumes, ph)
    }

    /// Equilibrium pH for the given volumes.
    pub fn solve_ph_with(&self, volumes: &VolumeState) -> ChemResult<f64> {
        self.check_volumes(volumes)?;
        if volumes.total() <= 0.0 {
            return Err(ChemError::UndefinedDilution {
                total_volume: volumes.total(),
            });
        }
        let result = brent_solve(
            |ph| self.evaluate_charge_balance(volumes, ph),
            &self.solver,
        )?;
        debug!(
            ph = result.root,
            residual = result.residual,
            iterations = result.iterations,
            total_volume = volumes.total(),
            "solved charge balance"
        );
        Ok(result.root)
    }

    /// Equilibrium pH for the solution's own volumes.
    pub fn solve_ph(&self) -> ChemResult<f64> {
        self.solve_ph_with(&self.volumes)
    }

    fn check_volumes(&self, volumes: &VolumeState) -> ChemResult<()> {
        if volumes.len() != self.solutes.len() {
            return Err(ChemError::VolumeCountMismatch {
                expected: self.solutes.len(),
                found: volumes.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::{FixedIonProduct, HarnedOwen};
    use ph_core::units::celsius;

    fn acetic_and_naoh() -> Solution {
        Solution::new(vec![
            Solute::base(vec![1e8], 0.1).unwrap(),
            Solute::acid(vec![1.8e-5], 0.1).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn empty_solution_rejected() {
        assert!(matches!(
            Solution::new(Vec::new()),
            Err(ChemError::InvalidArg { .. })
        ));
    }

    #[test]
    fn solve_without_volume_is_undefined_dilution() {
        let solution = acetic_and_naoh();
        assert!(matches!(
            solution.solve_ph(),
            Err(ChemError::UndefinedDilution { .. })
        ));
        assert!(matches!(
            solution.charge_balance(7.0),
            Err(ChemError::UndefinedDilution { .. })
        ));
    }

    #[test]
    fn solved_ph_zeroes_charge_balance() {
        let mut solution = acetic_and_naoh();
        solution.set_volume(1, 10.0).unwrap();
        for v in [0.0, 2.5, 5.0, 9.9, 10.0, 10.1, 15.0] {
            solution.set_volume(0, v).unwrap();
            let ph = solution.solve_ph().unwrap();
            assert!(solution.charge_balance(ph).unwrap().abs() < 1e-8);
        }
    }

    #[test]
    fn buffer_at_half_neutralisation() {
        let mut solution = acetic_and_naoh();
        solution.set_volume(0, 5.0).unwrap();
        solution.set_volume(1, 10.0).unwrap();
        let ph = solution.solve_ph().unwrap();
        assert!((ph - 4.745).abs() < 0.01);
    }

    #[test]
    fn pure_water_is_neutral() {
        // A vanishingly dilute acid leaves the water equilibrium in control
        let mut solution = Solution::new(vec![Solute::acid(vec![1e-5], 1e-15).unwrap()]).unwrap();
        solution.set_volume(0, 1.0).unwrap();
        let ph = solution.solve_ph().unwrap();
        assert!((ph - 7.0).abs() < 1e-6);
    }

    #[test]
    fn explicit_volumes_do_not_mutate() {
        let solution = acetic_and_naoh();
        let volumes = VolumeState::from_volumes(vec![5.0, 10.0]).unwrap();
        let ph = solution.solve_ph_with(&volumes).unwrap();
        assert!(ph > 4.0 && ph < 5.5);
        assert_eq!(solution.total_volume(), 0.0);
    }

    #[test]
    fn volume_count_mismatch() {
        let solution = acetic_and_naoh();
        let volumes = VolumeState::from_volumes(vec![1.0]).unwrap();
        assert_eq!(
            solution.solve_ph_with(&volumes),
            Err(ChemError::VolumeCountMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn set_volumes_checks_count() {
        let mut solution = acetic_and_naoh();
        let wrong = VolumeState::from_volumes(vec![1.0]).unwrap();
        assert!(matches!(
            solution.set_volumes(wrong),
            Err(ChemError::VolumeCountMismatch { .. })
        ));
        assert_eq!(solution.total_volume(), 0.0);

        solution
            .set_volumes(VolumeState::from_volumes(vec![5.0, 10.0]).unwrap())
            .unwrap();
        assert_eq!(solution.total_volume(), 15.0);
    }

    #[test]
    fn base_charge_is_added() {
        let mut solution = Solution::new(vec![Solute::base(vec![1e8], 0.01).unwrap()]).unwrap();
        solution.set_volume(0, 1.0).unwrap();
        // At pH 7 the fully protonated strong base leaves a positive excess
        assert!(solution.charge_balance(7.0).unwrap() > 0.0);
        let ph = solution.solve_ph().unwrap();
        assert!((ph - 12.0).abs() < 1e-3);
    }

    #[test]
    fn narrow_bracket_reports_no_root() {
        let mut solution = acetic_and_naoh().with_solver_config(BrentConfig {
            bracket: ph_solver::Bracket::new(8.0, 9.0).unwrap(),
            ..BrentConfig::default()
        });
        solution.set_volume(1, 10.0).unwrap();
        assert_eq!(
            solution.solve_ph(),
            Err(ChemError::NoRootInRange {
                lower: 8.0,
                upper: 9.0
            })
        );
    }

    #[test]
    fn iteration_cap_reports_convergence_failure() {
        let mut solution = acetic_and_naoh().with_solver_config(BrentConfig {
            max_iterations: 1,
            ..BrentConfig::default()
        });
        solution.set_volume(1, 10.0).unwrap();
        assert_eq!(
            solution.solve_ph(),
            Err(ChemError::ConvergenceFailed { iterations: 1 })
        );
    }

    #[test]
    fn temperature_updates_kw() {
        let mut solution = Solution::with_water_model(
            vec![Solute::acid(vec![1e-5], 1e-15).unwrap()],
            Arc::new(HarnedOwen),
            celsius(25.0),
        )
        .unwrap();
        let kw_25 = solution.kw();
        solution.set_temperature(celsius(50.0)).unwrap();
        assert!(solution.kw() > kw_25);
        assert!((ph_core::as_celsius(solution.temperature()) - 50.0).abs() < 1e-9);

        solution.set_volume(0, 1.0).unwrap();
        let ph = solution.solve_ph().unwrap();
        // Neutral water is more acidic when warm
        assert!(ph < 7.0 && ph > 6.5);
    }

    #[test]
    fn failed_temperature_change_keeps_state() {
        let mut solution = Solution::with_water_model(
            vec![Solute::acid(vec![1e-5], 0.1).unwrap()],
            Arc::new(HarnedOwen),
            celsius(25.0),
        )
        .unwrap();
        let kw = solution.kw();
        assert!(solution.set_temperature(celsius(95.0)).is_err());
        assert_eq!(solution.kw(), kw);
    }

    #[test]
    fn custom_fixed_kw_is_used() {
        let solution = Solution::with_water_model(
            vec![Solute::acid(vec![1e-5], 0.1).unwrap()],
            Arc::new(FixedIonProduct::new(1e-13).unwrap()),
            celsius(25.0),
        )
        .unwrap();
        assert_eq!(solution.kw(), 1e-13);
        assert_eq!(solution.water_model().name(), "fixed");
    }
}
