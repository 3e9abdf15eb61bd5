//! Brent's method with a bounded iteration count.

use crate::error::SolverError;
use ph_core::{PH_LOWER, PH_UPPER};
use tracing::trace;

/// Closed interval searched for a sign change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bracket {
    pub lower: f64,
    pub upper: f64,
}

impl Bracket {
    pub fn new(lower: f64, upper: f64) -> Result<Self, SolverError> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(SolverError::InvalidBracket { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// The aqueous pH window [-2, 16].
    pub fn ph() -> Self {
        Self {
            lower: PH_LOWER,
            upper: PH_UPPER,
        }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Brent solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrentConfig {
    /// Interval that must contain the root
    pub bracket: Bracket,
    /// Absolute tolerance on x
    pub xtol: f64,
    /// Relative tolerance on x
    pub rtol: f64,
    /// Maximum residual evaluations after the two endpoint evaluations
    pub max_iterations: usize,
}

impl Default for BrentConfig {
    fn default() -> Self {
        Self {
            bracket: Bracket::ph(),
            xtol: 1e-10,
            rtol: 4.0 * f64::EPSILON,
            max_iterations: 200,
        }
    }
}

/// Brent iteration result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrentResult {
    /// Located root
    pub root: f64,
    /// Residual at the root
    pub residual: f64,
    /// Number of iterations
    pub iterations: usize,
}

/// Find a zero of `f` inside `config.bracket`.
///
/// Combines bisection with secant and inverse quadratic steps (Brent 1973).
/// The residual closure may fail with any error type that can absorb a
/// [`SolverError`]; such failures abort the search and are returned as is.
pub fn brent_solve<F, E>(mut f: F, config: &BrentConfig) -> Result<BrentResult, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    let Bracket { lower, upper } = Bracket::new(config.bracket.lower, config.bracket.upper)?;

    let mut eval = |x: f64| -> Result<f64, E> {
        let value = f(x)?;
        if value.is_nan() {
            return Err(SolverError::NonFinite { x, value }.into());
        }
        Ok(value)
    };

    let mut xpre = lower;
    let mut xcur = upper;
    let mut fpre = eval(xpre)?;
    let mut fcur = eval(xcur)?;

    if fpre == 0.0 {
        return Ok(BrentResult {
            root: xpre,
            residual: fpre,
            iterations: 0,
        });
    }
    if fcur == 0.0 {
        return Ok(BrentResult {
            root: xcur,
            residual: fcur,
            iterations: 0,
        });
    }
    if fpre.is_sign_negative() == fcur.is_sign_negative() {
        return Err(SolverError::NoSignChange {
            lower,
            upper,
            f_lower: fpre,
            f_upper: fcur,
        }
        .into());
    }

    // xblk is the contrapoint: f(xblk) and f(xcur) always have opposite signs
    let mut xblk = 0.0;
    let mut fblk = 0.0;
    let mut spre = 0.0;
    let mut scur = 0.0;

    for iter in 0..config.max_iterations {
        if fpre != 0.0 && fcur != 0.0 && fpre.is_sign_negative() != fcur.is_sign_negative() {
            xblk = xpre;
            fblk = fpre;
            scur = xcur - xpre;
            spre = scur;
        }
        if fblk.abs() < fcur.abs() {
            xpre = xcur;
            xcur = xblk;
            xblk = xpre;

            fpre = fcur;
            fcur = fblk;
            fblk = fpre;
        }

        let delta = (config.xtol + config.rtol * xcur.abs()) / 2.0;
        let sbis = (xblk - xcur) / 2.0;
        if fcur == 0.0 || sbis.abs() < delta {
            trace!(iter, root = xcur, "brent converged");
            return Ok(BrentResult {
                root: xcur,
                residual: fcur,
                iterations: iter,
            });
        }

        if spre.abs() > delta && fcur.abs() < fpre.abs() {
            let stry = if xpre == xblk {
                // secant
                -fcur * (xcur - xpre) / (fcur - fpre)
            } else {
                // inverse quadratic
                let dpre = (fpre - fcur) / (xpre - xcur);
                let dblk = (fblk - fcur) / (xblk - xcur);
                -fcur * (fblk * dblk - fpre * dpre) / (dblk * dpre * (fblk - fpre))
            };
            if 2.0 * stry.abs() < spre.abs().min(3.0 * sbis.abs() - delta) {
                spre = scur;
                scur = stry;
            } else {
                spre = sbis;
                scur = sbis;
            }
        } else {
            spre = sbis;
            scur = sbis;
        }

        xpre = xcur;
        fpre = fcur;
        if scur.abs() > delta {
            xcur += scur;
        } else if sbis > 0.0 {
            xcur += delta;
        } else {
            xcur -= delta;
        }
        fcur = eval(xcur)?;
        trace!(iter, x = xcur, f = fcur, "brent step");
    }

    Err(SolverError::ConvergenceFailed {
        iterations: config.max_iterations,
        last_x: xcur,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverResult;

    fn config(lower: f64, upper: f64) -> BrentConfig {
        BrentConfig {
            bracket: Bracket::new(lower, upper).unwrap(),
            ..BrentConfig::default()
        }
    }

    #[test]
    fn square_root_of_two() {
        let result: BrentResult =
            brent_solve(|x| -> SolverResult<f64> { Ok(x * x - 2.0) }, &config(0.0, 2.0))
                .unwrap();
        assert!((result.root - 2f64.sqrt()).abs() < 1e-10);
        assert!(result.iterations < 20);
    }

    #[test]
    fn root_at_endpoint_returns_immediately() {
        let result =
            brent_solve(|x| -> SolverResult<f64> { Ok(x - 1.0) }, &config(1.0, 3.0)).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn same_sign_is_rejected() {
        let err = brent_solve(|x| -> SolverResult<f64> { Ok(x * x + 1.0) }, &config(-1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, SolverError::NoSignChange { .. }));
    }

    #[test]
    fn iteration_limit_is_enforced() {
        let cfg = BrentConfig {
            max_iterations: 2,
            ..config(0.0, 100.0)
        };
        let err = brent_solve(|x| -> SolverResult<f64> { Ok(x.powi(9) - 3.0) }, &cfg).unwrap_err();
        assert!(matches!(
            err,
            SolverError::ConvergenceFailed { iterations: 2, .. }
        ));
    }

    #[test]
    fn invalid_bracket_rejected() {
        assert!(Bracket::new(2.0, 1.0).is_err());
        assert!(Bracket::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn nan_residual_is_reported() {
        let err = brent_solve(
            |x| -> SolverResult<f64> { Ok(if x > 0.5 { f64::NAN } else { x - 1.0 }) },
            &config(0.0, 2.0),
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::NonFinite { .. }));
    }

    #[test]
    fn steep_exponential_residual() {
        // Charge-balance-like residual spanning many decades
        let f = |ph: f64| -> SolverResult<f64> {
            let h = 10f64.powf(-ph);
            Ok(h - 1e-14 / h - 1e-3)
        };
        let result = brent_solve(f, &BrentConfig::default()).unwrap();
        assert!((result.root - 3.0).abs() < 1e-6);
    }

    #[test]
    fn closure_errors_propagate() {
        #[derive(Debug, PartialEq)]
        enum Custom {
            Solver(SolverError),
            Boom,
        }
        impl From<SolverError> for Custom {
            fn from(e: SolverError) -> Self {
                Custom::Solver(e)
            }
        }
        let err = brent_solve(|_| -> Result<f64, Custom> { Err(Custom::Boom) }, &config(0.0, 1.0))
            .unwrap_err();
        assert_eq!(err, Custom::Boom);
    }
}
