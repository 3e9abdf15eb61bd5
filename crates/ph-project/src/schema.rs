//! Scenario schema definitions.

use ph_core::units::constants::STANDARD_TEMPERATURE_C;
use ph_titration::DEFAULT_SAMPLE_COUNT;
use serde::{Deserialize, Serialize};

/// A titration described on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default = "default_temperature_c")]
    pub temperature_c: f64,
    #[serde(default)]
    pub water_model: WaterModelDef,
    pub titrant: SoluteDef,
    #[serde(default)]
    pub analytes: Vec<AnalyteDef>,
    pub max_titrant_volume: f64,
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    #[serde(default)]
    pub parallel: bool,
}

fn default_temperature_c() -> f64 {
    STANDARD_TEMPERATURE_C
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaterModelDef {
    /// Kw = 1e-14 regardless of temperature
    #[default]
    Fixed,
    HarnedOwen,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoluteKindDef {
    Acid,
    Base,
}

/// A solute given either by dissociation constants `k` or by their
/// negative logarithms `pk`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoluteDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: SoluteKindDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<Vec<f64>>,
    pub concentration: f64,
}

/// A solute placed in the vessel before titration starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyteDef {
    #[serde(flatten)]
    pub solute: SoluteDef,
    pub volume: f64,
}
