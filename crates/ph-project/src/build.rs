//! Turning a validated scenario into a runnable titration.

use crate::ProjectResult;
use crate::schema::{Scenario, SoluteDef, SoluteKindDef, WaterModelDef};
use crate::validate::validate_scenario;
use ph_chem::{ChemResult, FixedIonProduct, HarnedOwen, Solute, SoluteKind, WaterModel};
use ph_core::units::celsius;
use ph_titration::{Titration, TitrationCurve, TitrationOptions};
use std::sync::Arc;
use tracing::info;

impl SoluteDef {
    /// Chemistry-side solute, with `pk` converted to K.
    pub fn to_solute(&self) -> ChemResult<Solute> {
        let kind = match self.kind {
            SoluteKindDef::Acid => SoluteKind::Acid,
            SoluteKindDef::Base => SoluteKind::Base,
        };
        let solute = match (&self.k, &self.pk) {
            (_, Some(pk)) => Solute::from_pk(pk, self.concentration, kind)?,
            (Some(k), None) => Solute::new(k.clone(), self.concentration, kind)?,
            (None, None) => Solute::new(Vec::new(), self.concentration, kind)?,
        };
        Ok(match &self.name {
            Some(name) => solute.named(name.clone()),
            None => solute,
        })
    }
}

impl WaterModelDef {
    pub fn to_model(self) -> Arc<dyn WaterModel> {
        match self {
            WaterModelDef::Fixed => Arc::new(FixedIonProduct::default()),
            WaterModelDef::HarnedOwen => Arc::new(HarnedOwen),
        }
    }
}

impl Scenario {
    /// Titration with the analyte volumes already assigned.
    pub fn build_titration(&self) -> ProjectResult<Titration> {
        validate_scenario(self)?;
        let titrant = self.titrant.to_solute()?;
        let analytes = self
            .analytes
            .iter()
            .map(|a| a.solute.to_solute())
            .collect::<ChemResult<Vec<_>>>()?;

        let mut titration = Titration::with_water_model(
            titrant,
            analytes,
            self.water_model.to_model(),
            celsius(self.temperature_c),
        )?
        .with_options(TitrationOptions {
            sample_count: self.sample_count,
            parallel: self.parallel,
        });
        titration.set_fixed_volumes(&self.analyte_volumes())?;
        Ok(titration)
    }

    pub fn analyte_volumes(&self) -> Vec<f64> {
        self.analytes.iter().map(|a| a.volume).collect()
    }

    /// Build and sweep the titration described by this scenario.
    pub fn run(&self) -> ProjectResult<TitrationCurve> {
        let mut titration = self.build_titration()?;
        info!(scenario = %self.name, "running scenario");
        let curve = titration.generate_curve(self.max_titrant_volume, &self.analyte_volumes())?;
        Ok(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AnalyteDef;

    fn solute(kind: SoluteKindDef, k: Option<Vec<f64>>, pk: Option<Vec<f64>>) -> SoluteDef {
        SoluteDef {
            name: None,
            kind,
            k,
            pk,
            concentration: 0.1,
        }
    }

    #[test]
    fn pk_is_converted() {
        let def = solute(SoluteKindDef::Acid, None, Some(vec![4.0, 9.0]));
        let s = def.to_solute().unwrap();
        assert!((s.constants()[0] - 1e-4).abs() < 1e-16);
        assert!((s.constants()[1] - 1e-9).abs() < 1e-21);
        assert!(s.is_acid());
    }

    #[test]
    fn name_is_carried() {
        let mut def = solute(SoluteKindDef::Base, Some(vec![1e8]), None);
        def.name = Some("NaOH".to_string());
        let s = def.to_solute().unwrap();
        assert_eq!(s.name(), Some("NaOH"));
        assert_eq!(s.kind(), SoluteKind::Base);
    }

    #[test]
    fn scenario_runs() {
        let scenario = Scenario {
            version: 1,
            name: "hcl".to_string(),
            temperature_c: 25.0,
            water_model: WaterModelDef::Fixed,
            titrant: solute(SoluteKindDef::Base, Some(vec![1e8]), None),
            analytes: vec![AnalyteDef {
                solute: solute(SoluteKindDef::Acid, Some(vec![1e8]), None),
                volume: 10.0,
            }],
            max_titrant_volume: 20.0,
            sample_count: 20,
            parallel: false,
        };
        let curve = scenario.run().unwrap();
        assert_eq!(curve.len(), 21);
        assert!((curve.points[0].ph - 1.0).abs() < 1e-6);
        assert!((curve.points[10].ph - 7.0).abs() < 0.1);
        assert!((curve.markers.half_equivalence - 10.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_scenario_is_not_built() {
        let scenario = Scenario {
            version: 1,
            name: "broken".to_string(),
            temperature_c: 25.0,
            water_model: WaterModelDef::Fixed,
            titrant: solute(SoluteKindDef::Base, None, None),
            analytes: Vec::new(),
            max_titrant_volume: 20.0,
            sample_count: 20,
            parallel: false,
        };
        assert!(matches!(
            scenario.build_titration(),
            Err(crate::ProjectError::Validation(_))
        ));
    }
}
