//! Scenario validation logic.

use crate::schema::{Scenario, SoluteDef, WaterModelDef};
use ph_chem::HarnedOwen;
use ph_core::pk_to_k;
use tracing::warn;

/// Constants outside this window are accepted but usually a unit mistake.
const PLAUSIBLE_K: (f64, f64) = (1e-20, 1e20);

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if !scenario.temperature_c.is_finite() {
        return Err(invalid(
            "temperature_c",
            scenario.temperature_c,
            "must be finite",
        ));
    }
    if scenario.water_model == WaterModelDef::HarnedOwen
        && !(HarnedOwen::MIN_CELSIUS..=HarnedOwen::MAX_CELSIUS).contains(&scenario.temperature_c)
    {
        return Err(invalid(
            "temperature_c",
            scenario.temperature_c,
            "outside the 0-60 °C range of the harned_owen water model",
        ));
    }

    validate_solute("titrant", &scenario.titrant)?;

    if scenario.analytes.is_empty() {
        return Err(ValidationError::MissingField {
            field: "analytes".to_string(),
        });
    }
    for (i, analyte) in scenario.analytes.iter().enumerate() {
        let context = format!("analytes[{i}]");
        validate_solute(&context, &analyte.solute)?;
        if !(analyte.volume.is_finite() && analyte.volume >= 0.0) {
            return Err(invalid(
                format!("{context}.volume"),
                analyte.volume,
                "must be finite and non-negative",
            ));
        }
    }

    if !(scenario.max_titrant_volume.is_finite() && scenario.max_titrant_volume >= 0.0) {
        return Err(invalid(
            "max_titrant_volume",
            scenario.max_titrant_volume,
            "must be finite and non-negative",
        ));
    }
    if scenario.sample_count == 0 {
        return Err(invalid("sample_count", 0, "must be positive"));
    }

    Ok(())
}

fn validate_solute(context: &str, solute: &SoluteDef) -> Result<(), ValidationError> {
    let constants = match (&solute.k, &solute.pk) {
        (Some(_), Some(_)) => {
            return Err(invalid(
                format!("{context}.pk"),
                "both k and pk",
                "give either k or pk, not both",
            ));
        }
        (None, None) => {
            return Err(ValidationError::MissingField {
                field: format!("{context}.k"),
            });
        }
        (Some(k), None) => {
            if let Some(&bad) = k.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
                return Err(invalid(
                    format!("{context}.k"),
                    bad,
                    "constants must be finite and positive",
                ));
            }
            k.clone()
        }
        (None, Some(pk)) => {
            if let Some(&bad) = pk.iter().find(|v| !v.is_finite()) {
                return Err(invalid(format!("{context}.pk"), bad, "must be finite"));
            }
            pk.iter().copied().map(pk_to_k).collect()
        }
    };

    if constants.is_empty() {
        return Err(invalid(
            format!("{context}.k"),
            "[]",
            "at least one constant is required",
        ));
    }
    for &k in &constants {
        if k < PLAUSIBLE_K.0 || k > PLAUSIBLE_K.1 {
            warn!(solute = context, k, "dissociation constant outside 1e-20..1e20");
        }
    }

    if !(solute.concentration.is_finite() && solute.concentration > 0.0) {
        return Err(invalid(
            format!("{context}.concentration"),
            solute.concentration,
            "must be finite and positive",
        ));
    }
    Ok(())
}
