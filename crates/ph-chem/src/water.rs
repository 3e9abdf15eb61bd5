//! Water autoionization (ion product Kw) models.

use crate::error::{ChemError, ChemResult};
use ph_core::concentration_to_ph;
use ph_core::units::{Temperature, as_celsius, as_kelvin};
use std::fmt;
use std::sync::Arc;

/// Kw at 25 °C.
pub const STANDARD_KW: f64 = 1.0e-14;

/// Provider of the temperature-dependent ion product of water.
///
/// Implementations must be thread-safe (Send + Sync) so a solution can be
/// shared across parallel curve samples.
pub trait WaterModel: fmt::Debug + Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Ion product [H+][OH-] at the given temperature.
    fn kw(&self, temperature: Temperature) -> ChemResult<f64>;

    /// `-log10(Kw)` at the given temperature.
    fn pkw(&self, temperature: Temperature) -> ChemResult<f64> {
        Ok(concentration_to_ph(self.kw(temperature)?))
    }
}

/// Temperature-independent ion product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedIonProduct {
    kw: f64,
}

impl FixedIonProduct {
    pub fn new(kw: f64) -> ChemResult<Self> {
        if !(kw.is_finite() && kw > 0.0) {
            return Err(ChemError::NonPositiveConstant {
                what: "water ion product",
                value: kw,
            });
        }
        Ok(Self { kw })
    }
}

impl Default for FixedIonProduct {
    fn default() -> Self {
        Self { kw: STANDARD_KW }
    }
}

impl WaterModel for FixedIonProduct {
    fn name(&self) -> &str {
        "fixed"
    }

    fn kw(&self, _temperature: Temperature) -> ChemResult<f64> {
        Ok(self.kw)
    }
}

/// Harned & Robinson (1940) fit of the ion product of water:
/// `pKw = 4470.99 / T - 6.0875 + 0.01706 T` with T in kelvin.
///
/// Fitted to EMF data between 0 and 60 °C; requests outside that window are
/// rejected instead of extrapolated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HarnedOwen;

impl HarnedOwen {
    pub const MIN_CELSIUS: f64 = 0.0;
    pub const MAX_CELSIUS: f64 = 60.0;
}

impl WaterModel for HarnedOwen {
    fn name(&self) -> &str {
        "harned-owen"
    }

    fn kw(&self, temperature: Temperature) -> ChemResult<f64> {
        Ok(10f64.powf(-self.pkw(temperature)?))
    }

    fn pkw(&self, temperature: Temperature) -> ChemResult<f64> {
        let t_c = as_celsius(temperature);
        if !(Self::MIN_CELSIUS..=Self::MAX_CELSIUS).contains(&t_c) {
            return Err(ChemError::OutOfRange {
                what: "water temperature (°C)",
                value: t_c,
            });
        }
        let t = as_kelvin(temperature);
        Ok(4470.99 / t - 6.0875 + 0.01706 * t)
    }
}

/// Shared handle to the 25 °C model used when no model is injected.
pub fn standard_water() -> Arc<dyn WaterModel> {
    Arc::new(FixedIonProduct::default())
}
