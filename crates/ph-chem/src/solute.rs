//! Dissolved acid or base with sequential dissociation steps.
//!
//! A solute with constants K1..Kn exists in n + 1 protonation states. The
//! charge model below evaluates their distribution with a nested recurrence
//! instead of expanding the degree-n polynomial, so constants that differ by
//! many orders of magnitude (strong next to very weak steps) stay well
//! conditioned.

use crate::error::{ChemError, ChemResult};
use ph_core::{ph_to_concentration, pk_to_k};
use std::fmt;

/// Whether a solute releases protons or hydroxide ions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoluteKind {
    Acid,
    Base,
}

/// One dissolved species with its stock concentration.
#[derive(Debug, Clone, PartialEq)]
pub struct Solute {
    name: Option<String>,
    constants: Vec<f64>,
    concentration: f64,
    kind: SoluteKind,
}

impl Solute {
    /// Create a solute from step-wise dissociation constants (K, not pK).
    pub fn new(
        constants: impl Into<Vec<f64>>,
        concentration: f64,
        kind: SoluteKind,
    ) -> ChemResult<Self> {
        let constants = constants.into();
        if constants.is_empty() {
            return Err(ChemError::NoConstants);
        }
        for &k in &constants {
            if !(k.is_finite() && k > 0.0) {
                return Err(ChemError::NonPositiveConstant {
                    what: "dissociation constant",
                    value: k,
                });
            }
        }
        if !(concentration.is_finite() && concentration > 0.0) {
            return Err(ChemError::NonPositiveConstant {
                what: "concentration",
                value: concentration,
            });
        }
        Ok(Self {
            name: None,
            constants,
            concentration,
            kind,
        })
    }

    pub fn acid(constants: impl Into<Vec<f64>>, concentration: f64) -> ChemResult<Self> {
        Self::new(constants, concentration, SoluteKind::Acid)
    }

    pub fn base(constants: impl Into<Vec<f64>>, concentration: f64) -> ChemResult<Self> {
        Self::new(constants, concentration, SoluteKind::Base)
    }

    /// Create a solute from tabulated pK values.
    pub fn from_pk(pks: &[f64], concentration: f64, kind: SoluteKind) -> ChemResult<Self> {
        if let Some(&bad) = pks.iter().find(|pk| !pk.is_finite()) {
            return Err(ChemError::NonPositiveConstant {
                what: "dissociation constant",
                value: bad,
            });
        }
        let constants: Vec<f64> = pks.iter().map(|&pk| pk_to_k(pk)).collect();
        Self::new(constants, concentration, kind)
    }

    /// Attach a display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn constants(&self) -> &[f64] {
        &self.constants
    }

    /// Formal concentration of the stock before dilution.
    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    pub fn kind(&self) -> SoluteKind {
        self.kind
    }

    pub fn is_acid(&self) -> bool {
        self.kind == SoluteKind::Acid
    }

    /// Number of protons (acid) or hydroxide ions (base) the species can release.
    pub fn max_charge(&self) -> usize {
        self.constants.len()
    }

    /// Concentration the equilibria are evaluated against at this pH.
    ///
    /// Acids see [H+]; bases see [OH-] = Kw / [H+].
    pub fn governing_concentration(&self, ph: f64, kw: f64) -> f64 {
        let h = ph_to_concentration(ph);
        match self.kind {
            SoluteKind::Acid => h,
            SoluteKind::Base => kw / h,
        }
    }

    /// Net charge concentration contributed to the mixture at `ph`.
    ///
    /// `proportion` is this solute's share of the total mixture volume. The
    /// result is unsigned with respect to the solute kind: the caller
    /// subtracts acid charges and adds base charges.
    pub fn charge(&self, ph: f64, kw: f64, proportion: f64) -> f64 {
        let c = self.governing_concentration(ph, kw);
        let n = self.constants.len();

        let mut actual = self.concentration * proportion / self.denominator(c);
        let mut charge = n as f64 * actual;
        for i in (1..n).rev() {
            actual *= c / self.constants[i];
            charge += i as f64 * actual;
        }
        charge
    }

    /// Alpha fractions of every protonation state, indexed by charge.
    ///
    /// Entry `i` is the fraction carrying charge `i` (0 = fully protonated
    /// acid / unprotonated base). The fractions sum to one.
    pub fn species_fractions(&self, ph: f64, kw: f64) -> Vec<f64> {
        let c = self.governing_concentration(ph, kw);
        let n = self.constants.len();

        let mut fractions = vec![0.0; n + 1];
        let mut actual = 1.0 / self.denominator(c);
        fractions[n] = actual;
        for i in (0..n).rev() {
            actual *= c / self.constants[i];
            fractions[i] = actual;
        }
        fractions
    }

    /// Mean charge per formula unit at `ph`, between 0 and `max_charge`.
    pub fn average_charge(&self, ph: f64, kw: f64) -> f64 {
        self.species_fractions(ph, kw)
            .iter()
            .enumerate()
            .map(|(i, a)| i as f64 * a)
            .sum()
    }

    // 1 + c/Kn (1 + c/Kn-1 (... (1 + c/K1))) = sum over states relative to the charge-n state
    fn denominator(&self, c: f64) -> f64 {
        self.constants
            .iter()
            .fold(1.0, |acc, &k| 1.0 + c * acc / k)
    }
}

impl fmt::Display for SoluteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acid => write!(f, "acid"),
            Self::Base => write!(f, "base"),
        }
    }
}

impl fmt::Display for Solute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} step(s), {} mol/L)",
            self.name.as_deref().unwrap_or("unnamed"),
            self.kind,
            self.constants.len(),
            self.concentration
        )
    }
}
