//! Per-solute stock volumes of a mixture.

use crate::error::{ChemError, ChemResult};
use ph_core::ensure_finite;

/// Volumes contributed by each solute, plus their cached sum.
///
/// Kept separate from the solutes so one set of solutes can be evaluated
/// against many volume assignments (one clone per curve sample).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VolumeState {
    volumes: Vec<f64>,
    total: f64,
}

impl VolumeState {
    /// All volumes zero.
    pub fn zeros(count: usize) -> Self {
        Self {
            volumes: vec![0.0; count],
            total: 0.0,
        }
    }

    pub fn from_volumes(volumes: impl Into<Vec<f64>>) -> ChemResult<Self> {
        let volumes = volumes.into();
        for (index, &volume) in volumes.iter().enumerate() {
            validate_volume(index, volume)?;
        }
        let mut state = Self { volumes, total: 0.0 };
        state.recompute_total_volume();
        Ok(state)
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    pub fn volume(&self, index: usize) -> ChemResult<f64> {
        self.volumes
            .get(index)
            .copied()
            .ok_or(ChemError::IndexOutOfRange {
                index,
                len: self.volumes.len(),
            })
    }

    /// Sum of all volumes as of the last recompute.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Assign one solute's volume and refresh the total.
    pub fn set_volume(&mut self, index: usize, volume: f64) -> ChemResult<()> {
        validate_volume(index, volume)?;
        let len = self.volumes.len();
        let slot = self
            .volumes
            .get_mut(index)
            .ok_or(ChemError::IndexOutOfRange { index, len })?;
        *slot = volume;
        self.recompute_total_volume();
        Ok(())
    }

    /// Copy of this state with one volume replaced.
    pub fn with_volume(&self, index: usize, volume: f64) -> ChemResult<Self> {
        let mut next = self.clone();
        next.set_volume(index, volume)?;
        Ok(next)
    }

    pub fn recompute_total_volume(&mut self) -> f64 {
        self.total = self.volumes.iter().sum();
        self.total
    }

    /// Dilution proportion `volume / total` of one solute.
    pub fn proportion(&self, index: usize) -> ChemResult<f64> {
        let volume = self.volume(index)?;
        if self.total <= 0.0 {
            return Err(ChemError::UndefinedDilution {
                total_volume: self.total,
            });
        }
        Ok(volume / self.total)
    }
}

fn validate_volume(index: usize, volume: f64) -> ChemResult<()> {
    if volume.is_nan() || volume < 0.0 {
        return Err(ChemError::NegativeVolume { index, volume });
    }
    ensure_finite(volume, "volume")?;
    Ok(())
}
