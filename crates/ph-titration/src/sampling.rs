//! Titrant volume sample generation.

use crate::error::{TitrationError, TitrationResult};

/// Default number of curve intervals.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// `sample_count + 1` evenly spaced volumes over `[0, max_volume]`.
pub fn sample_volumes(max_volume: f64, sample_count: usize) -> TitrationResult<Vec<f64>> {
    if sample_count == 0 {
        return Err(TitrationError::InvalidArg {
            what: "sample count must be positive",
        });
    }
    if !(max_volume.is_finite() && max_volume >= 0.0) {
        return Err(TitrationError::InvalidArg {
            what: "maximum titrant volume must be finite and non-negative",
        });
    }

    let delta = max_volume / sample_count as f64;
    let mut points: Vec<f64> = (0..=sample_count).map(|i| i as f64 * delta).collect();

    // Ensure exact endpoint
    points[sample_count] = max_volume;
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_both_endpoints() {
        let points = sample_volumes(20.0, 4).unwrap();
        assert_eq!(points, vec![0.0, 5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn default_count_gives_1001_points() {
        let points = sample_volumes(0.3, DEFAULT_SAMPLE_COUNT).unwrap();
        assert_eq!(points.len(), 1001);
        assert_eq!(points[1000], 0.3);
        assert!(points.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(sample_volumes(10.0, 0).is_err());
        assert!(sample_volumes(-1.0, 10).is_err());
        assert!(sample_volumes(f64::INFINITY, 10).is_err());
    }
}
