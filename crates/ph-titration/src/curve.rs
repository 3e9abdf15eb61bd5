//! Titration curve data handed to renderers and exporters.

use ph_core::{NEUTRAL_PH, Tolerances, nearly_equal};
use serde::Serialize;

/// Solver-level differences between neighbouring pH values.
const PH_NOISE: Tolerances = Tolerances {
    abs: 1e-9,
    rel: 0.0,
};

/// One sample of the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Titrant volume added
    pub volume: f64,
    /// Equilibrium pH at that volume
    pub ph: f64,
}

/// Reference lines drawn alongside the curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquivalenceMarkers {
    /// Titrant volume carrying as many equivalents as the first fixed solute
    pub half_equivalence: f64,
    /// Twice `half_equivalence`
    pub full_equivalence: f64,
    /// `k * half_equivalence` for every dissociation step k of the first fixed solute
    pub equivalence_volumes: Vec<f64>,
    /// Horizontal neutral line
    pub reference_ph: f64,
}

impl EquivalenceMarkers {
    /// Markers for `fixed_volume` of a stock at `fixed_concentration` titrated
    /// by a titrant at `titrant_concentration`.
    pub fn from_amounts(
        fixed_volume: f64,
        fixed_concentration: f64,
        titrant_concentration: f64,
        steps: usize,
    ) -> Self {
        let unit = fixed_volume * fixed_concentration / titrant_concentration;
        Self {
            half_equivalence: unit,
            full_equivalence: 2.0 * unit,
            equivalence_volumes: (1..=steps).map(|k| k as f64 * unit).collect(),
            reference_ph: NEUTRAL_PH,
        }
    }
}

/// Region of the curve where pH changes fastest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteepRegion {
    /// Midpoint volume of the steepest interval
    pub volume: f64,
    /// pH at the interval midpoint
    pub ph: f64,
    /// dpH / dV over the interval
    pub slope: f64,
}

/// Ordered (volume, pH) samples plus their markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitrationCurve {
    pub points: Vec<CurvePoint>,
    pub markers: EquivalenceMarkers,
}

impl TitrationCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.volume).collect()
    }

    pub fn ph_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ph).collect()
    }

    /// Linearly interpolated pH at `volume`, `None` outside the sampled range.
    pub fn ph_at(&self, volume: f64) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if volume < first.volume || volume > last.volume {
            return None;
        }
        if self.points.len() == 1 {
            return Some(first.ph);
        }
        let upper = self
            .points
            .partition_point(|p| p.volume < volume)
            .clamp(1, self.points.len() - 1);
        let a = self.points[upper - 1];
        let b = self.points[upper];
        let span = b.volume - a.volume;
        if span <= 0.0 {
            return Some(b.ph);
        }
        Some(a.ph + (b.ph - a.ph) * (volume - a.volume) / span)
    }

    /// Whether pH never decreases as titrant is added, ignoring dips within
    /// solver tolerance.
    pub fn is_non_decreasing(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[1].ph >= w[0].ph || nearly_equal(w[0].ph, w[1].ph, PH_NOISE))
    }

    /// The `count` strongest interior local maxima of |dpH/dV|, in order of
    /// increasing volume.
    ///
    /// These are the inflection regions around equivalence points.
    pub fn steepest_regions(&self, count: usize) -> Vec<SteepRegion> {
        let intervals: Vec<SteepRegion> = self
            .points
            .windows(2)
            .filter(|w| w[1].volume > w[0].volume)
            .map(|w| SteepRegion {
                volume: 0.5 * (w[0].volume + w[1].volume),
                ph: 0.5 * (w[0].ph + w[1].ph),
                slope: (w[1].ph - w[0].ph) / (w[1].volume - w[0].volume),
            })
            .collect();

        let mut peaks: Vec<SteepRegion> = intervals
            .windows(3)
            .filter(|w| {
                let s = w[1].slope.abs();
                s > w[0].slope.abs() && s >= w[2].slope.abs()
            })
            .map(|w| w[1])
            .collect();

        peaks.sort_by(|a, b| b.slope.abs().total_cmp(&a.slope.abs()));
        peaks.truncate(count);
        peaks.sort_by(|a, b| a.volume.total_cmp(&b.volume));
        peaks
    }
}
