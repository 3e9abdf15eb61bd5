use crate::PhError;

/// Floating point type used throughout system
pub type Real = f64;

/// Lower end of the pH bracket searched by the equilibrium solver.
pub const PH_LOWER: Real = -2.0;

/// Upper end of the pH bracket searched by the equilibrium solver.
pub const PH_UPPER: Real = 16.0;

/// pH of pure water at 25 °C, used as the neutral reference line on curves.
pub const NEUTRAL_PH: Real = 7.0;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PhError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PhError::NonFinite { what, value: v })
    }
}

/// Hydrogen-ion concentration for a pH value: `10^(-pH)`.
#[inline]
pub fn ph_to_concentration(ph: Real) -> Real {
    10f64.powf(-ph)
}

/// pH for a hydrogen-ion concentration: `-log10(c)`.
#[inline]
pub fn concentration_to_ph(c: Real) -> Real {
    -c.log10()
}

/// Equilibrium constant from its negative decadic logarithm.
#[inline]
pub fn pk_to_k(pk: Real) -> Real {
    10f64.powf(-pk)
}
