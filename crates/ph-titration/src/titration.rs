//! Titrant volume sweep over a mixture.

use crate::curve::{CurvePoint, EquivalenceMarkers, TitrationCurve};
use crate::error::{TitrationError, TitrationResult};
use crate::sampling::{DEFAULT_SAMPLE_COUNT, sample_volumes};
use ph_chem::{ChemResult, Solute, Solution, VolumeState, WaterModel};
use ph_core::units::Temperature;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::info;

/// Position of the titrant inside the underlying solution.
const TITRANT: usize = 0;

/// Sweep options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitrationOptions {
    /// Number of volume intervals; the curve has `sample_count + 1` points
    pub sample_count: usize,
    /// Evaluate samples on the rayon thread pool
    pub parallel: bool,
}

impl Default for TitrationOptions {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            parallel: false,
        }
    }
}

/// A solution in which one solute (the titrant) is added in varying volume
/// while the remaining solutes keep fixed volumes.
#[derive(Debug, Clone)]
pub struct Titration {
    solution: Solution,
    options: TitrationOptions,
}

impl Titration {
    /// Titration at 25 °C with Kw = 1e-14.
    ///
    /// `fixed` keeps its order; fixed volumes are later matched by position.
    pub fn new(titrant: Solute, fixed: Vec<Solute>) -> TitrationResult<Self> {
        Self::from_solution(Solution::new(Self::layout(titrant, fixed)?)?)
    }

    pub fn with_water_model(
        titrant: Solute,
        fixed: Vec<Solute>,
        water_model: Arc<dyn WaterModel>,
        temperature: Temperature,
    ) -> TitrationResult<Self> {
        let solution =
            Solution::with_water_model(Self::layout(titrant, fixed)?, water_model, temperature)?;
        Self::from_solution(solution)
    }

    /// Wrap an existing solution whose first solute is the titrant.
    pub fn from_solution(solution: Solution) -> TitrationResult<Self> {
        if solution.solutes().len() < 2 {
            return Err(TitrationError::InvalidArg {
                what: "titration needs a titrant and at least one fixed solute",
            });
        }
        Ok(Self {
            solution,
            options: TitrationOptions::default(),
        })
    }

    pub fn with_options(mut self, options: TitrationOptions) -> Self {
        self.options = options;
        self
    }

    fn layout(titrant: Solute, fixed: Vec<Solute>) -> TitrationResult<Vec<Solute>> {
        if fixed.is_empty() {
            return Err(TitrationError::InvalidArg {
                what: "titration needs a titrant and at least one fixed solute",
            });
        }
        let mut solutes = Vec::with_capacity(fixed.len() + 1);
        solutes.push(titrant);
        solutes.extend(fixed);
        Ok(solutes)
    }

    pub fn options(&self) -> TitrationOptions {
        self.options
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn solution_mut(&mut self) -> &mut Solution {
        &mut self.solution
    }

    pub fn titrant(&self) -> &Solute {
        &self.solution.solutes()[TITRANT]
    }

    pub fn fixed_solutes(&self) -> &[Solute] {
        &self.solution.solutes()[TITRANT + 1..]
    }

    /// Assign the fixed solutes' volumes in declaration order.
    ///
    /// Either every volume is applied or, on error, none is.
    pub fn set_fixed_volumes(&mut self, fixed_volumes: &[f64]) -> TitrationResult<()> {
        let expected = self.fixed_solutes().len();
        if fixed_volumes.len() != expected {
            return Err(TitrationError::FixedVolumeCountMismatch {
                expected,
                found: fixed_volumes.len(),
            });
        }
        let mut next = self.solution.volumes().clone();
        for (offset, &volume) in fixed_volumes.iter().enumerate() {
            next.set_volume(TITRANT + 1 + offset, volume)?;
        }
        self.solution.set_volumes(next)?;
        Ok(())
    }

    /// pH after adding `titrant_volume`, with the fixed volumes as last set.
    pub fn compute_ph(&mut self, titrant_volume: f64) -> TitrationResult<f64> {
        Ok(self.solve_at(titrant_volume)?)
    }

    fn solve_at(&mut self, titrant_volume: f64) -> ChemResult<f64> {
        self.solution.set_volume(TITRANT, titrant_volume)?;
        self.solution.solve_ph()
    }

    /// Reference volumes derived from the first fixed solute and the titrant.
    pub fn equivalence_markers(&self) -> TitrationResult<EquivalenceMarkers> {
        let analyte = &self.fixed_solutes()[0];
        let analyte_volume = self.solution.volumes().volume(TITRANT + 1)?;
        Ok(EquivalenceMarkers::from_amounts(
            analyte_volume,
            analyte.concentration(),
            self.titrant().concentration(),
            analyte.max_charge(),
        ))
    }

    /// Sweep the titrant from 0 to `max_titrant_volume`.
    ///
    /// Fails before any sample is evaluated if `fixed_volumes` does not match
    /// the fixed solutes. A failing sample aborts the whole sweep.
    pub fn generate_curve(
        &mut self,
        max_titrant_volume: f64,
        fixed_volumes: &[f64],
    ) -> TitrationResult<TitrationCurve> {
        if self.options.parallel {
            return self.generate_curve_parallel(max_titrant_volume, fixed_volumes);
        }

        self.set_fixed_volumes(fixed_volumes)?;
        let volumes = sample_volumes(max_titrant_volume, self.options.sample_count)?;
        info!(
            samples = volumes.len(),
            max_titrant_volume, "generating titration curve"
        );

        let mut points = Vec::with_capacity(volumes.len());
        for (index, &volume) in volumes.iter().enumerate() {
            let ph = self
                .solve_at(volume)
                .map_err(|source| TitrationError::SampleFailed {
                    index,
                    volume,
                    source,
                })?;
            points.push(CurvePoint { volume, ph });
        }

        self.finish(points)
    }

    /// Same curve as [`generate_curve`](Self::generate_curve), with every
    /// sample solved on its own copy of the volume state in parallel.
    pub fn generate_curve_parallel(
        &mut self,
        max_titrant_volume: f64,
        fixed_volumes: &[f64],
    ) -> TitrationResult<TitrationCurve> {
        self.set_fixed_volumes(fixed_volumes)?;
        let volumes = sample_volumes(max_titrant_volume, self.options.sample_count)?;
        info!(
            samples = volumes.len(),
            max_titrant_volume, "generating titration curve in parallel"
        );

        let base: &VolumeState = self.solution.volumes();
        let solution = &self.solution;
        let points = volumes
            .par_iter()
            .enumerate()
            .map(|(index, &volume)| {
                base.with_volume(TITRANT, volume)
                    .and_then(|state| solution.solve_ph_with(&state))
                    .map(|ph| CurvePoint { volume, ph })
                    .map_err(|source| TitrationError::SampleFailed {
                        index,
                        volume,
                        source,
                    })
            })
            .collect::<TitrationResult<Vec<_>>>()?;

        // Leave the solution where a sequential sweep would have left it
        self.solution.set_volume(TITRANT, max_titrant_volume)?;
        self.finish(points)
    }

    fn finish(&self, points: Vec<CurvePoint>) -> TitrationResult<TitrationCurve> {
        let markers = self.equivalence_markers()?;
        info!(
            points = points.len(),
            half_equivalence = markers.half_equivalence,
            full_equivalence = markers.full_equivalence,
            "titration curve complete"
        );
        Ok(TitrationCurve { points, markers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_chem::ChemError;

    fn acetic_with_naoh() -> Titration {
        Titration::new(
            Solute::base(vec![1e8], 0.1).unwrap(),
            vec![Solute::acid(vec![1.8e-5], 0.1).unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn requires_fixed_solute() {
        let err = Titration::new(Solute::base(vec![1e8], 0.1).unwrap(), Vec::new()).unwrap_err();
        assert!(matches!(err, TitrationError::InvalidArg { .. }));
    }

    #[test]
    fn compute_ph_is_idempotent() {
        let mut t = acetic_with_naoh();
        t.set_fixed_volumes(&[10.0]).unwrap();
        let first = t.compute_ph(7.3).unwrap();
        let _ = t.compute_ph(12.0).unwrap();
        let again = t.compute_ph(7.3).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn compute_ph_without_any_volume_fails() {
        let mut t = acetic_with_naoh();
        let err = t.compute_ph(0.0).unwrap_err();
        assert!(matches!(
            err,
            TitrationError::Chem(ChemError::UndefinedDilution { .. })
        ));
    }

    #[test]
    fn negative_titrant_volume_rejected() {
        let mut t = acetic_with_naoh();
        t.set_fixed_volumes(&[10.0]).unwrap();
        let err = t.compute_ph(-1.0).unwrap_err();
        assert!(matches!(
            err,
            TitrationError::Chem(ChemError::NegativeVolume { index: 0, .. })
        ));
    }

    #[test]
    fn curve_has_sample_count_plus_one_points() {
        let mut t = acetic_with_naoh().with_options(TitrationOptions {
            sample_count: 40,
            parallel: false,
        });
        let curve = t.generate_curve(20.0, &[10.0]).unwrap();
        assert_eq!(curve.len(), 41);
        assert_eq!(curve.points[0].volume, 0.0);
        assert_eq!(curve.points[40].volume, 20.0);
        assert!((curve.points[0].ph - 2.875).abs() < 0.01);
        assert!((curve.markers.half_equivalence - 10.0).abs() < 1e-12);
        assert!((curve.markers.full_equivalence - 20.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_fixed_volumes_fail_first() {
        let mut t = acetic_with_naoh();
        let err = t.generate_curve(20.0, &[]).unwrap_err();
        assert!(matches!(
            err,
            TitrationError::FixedVolumeCountMismatch {
                expected: 1,
                found: 0
            }
        ));
        // No sample touched the titrant volume
        assert_eq!(t.solution().total_volume(), 0.0);
    }

    #[test]
    fn rejected_fixed_volumes_leave_state_untouched() {
        let mut t = Titration::new(
            Solute::base(vec![1e8], 0.1).unwrap(),
            vec![
                Solute::acid(vec![1.8e-5], 0.1).unwrap(),
                Solute::acid(vec![1e8], 0.1).unwrap(),
            ],
        )
        .unwrap();
        t.set_fixed_volumes(&[5.0, 5.0]).unwrap();
        let before = t.solution().volumes().clone();

        let err = t.generate_curve(10.0, &[10.0, -1.0]).unwrap_err();
        assert!(matches!(
            err,
            TitrationError::Chem(ChemError::NegativeVolume { index: 2, .. })
        ));
        assert_eq!(t.solution().volumes(), &before);

        let mut fresh = Titration::new(
            Solute::base(vec![1e8], 0.1).unwrap(),
            vec![
                Solute::acid(vec![1.8e-5], 0.1).unwrap(),
                Solute::acid(vec![1e8], 0.1).unwrap(),
            ],
        )
        .unwrap();
        assert!(fresh.generate_curve(10.0, &[10.0, -1.0]).is_err());
        // The valid first entry was not applied either
        assert_eq!(fresh.solution().volumes().volumes(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn failing_sample_aborts_curve() {
        // No fixed volume: the first sample (0 mL titrant) has zero total volume
        let mut t = acetic_with_naoh().with_options(TitrationOptions {
            sample_count: 10,
            parallel: false,
        });
        let err = t.generate_curve(5.0, &[0.0]).unwrap_err();
        match err {
            TitrationError::SampleFailed { index, volume, source } => {
                assert_eq!(index, 0);
                assert_eq!(volume, 0.0);
                assert!(matches!(source, ChemError::UndefinedDilution { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let options = TitrationOptions {
            sample_count: 50,
            parallel: false,
        };
        let mut sequential = acetic_with_naoh().with_options(options);
        let mut parallel = acetic_with_naoh().with_options(TitrationOptions {
            parallel: true,
            ..options
        });

        let a = sequential.generate_curve(25.0, &[10.0]).unwrap();
        let b = parallel.generate_curve(25.0, &[10.0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            sequential.solution().volumes(),
            parallel.solution().volumes()
        );
    }
}
