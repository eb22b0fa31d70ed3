use std::{fmt::{self, Display, Formatter}, ops::Deref};

use crate::RocError;

/// Tolerance applied when checking that a probability mass function does not sum above 1.
pub const MASS_TOLERANCE: f64 = 1e-9;

/// Probability mass function of the number of generations separating two sampled cases.
///
/// `pdf[g]` is the probability that two cases are exactly `g` generations apart (index 0 = same case
/// generation). The distribution may be truncated (total mass <= 1) and need not be monotonic.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationDistribution(Vec<f64>);

impl GenerationDistribution {
    /// # Errors
    /// `RocError::InvalidDistribution` if:
    /// - `pdf` is empty
    /// - any probability is negative, NaN or infinite
    /// - the total mass exceeds 1
    ///
    /// Note that an all-zero distribution is considered valid here. It only becomes an error once
    /// an upper generation bound must be inferred from it (see `RocParams::resolve()`)
    pub fn new(pdf: Vec<f64>) -> Result<Self, RocError> {
        if pdf.is_empty() {
            return Err(RocError::InvalidDistribution("no probabilities were provided".to_string()))
        }

        if let Some((gens, p)) = pdf.iter().enumerate().find(|(_, p)| ! p.is_finite() || **p < 0.0) {
            return Err(RocError::InvalidDistribution(format!("found an invalid probability ({p}) for {gens} generation(s)")))
        }

        let mass: f64 = pdf.iter().sum();
        if mass > 1.0 + MASS_TOLERANCE {
            return Err(RocError::InvalidDistribution(format!("probabilities sum to {mass}, which is greater than 1")))
        }
        Ok(Self(pdf))
    }

    /// Probability of two cases being separated by exactly `generations`. Zero past the end of the pmf.
    #[must_use]
    pub fn probability(&self, generations: usize) -> f64 {
        self.0.get(generations).copied().unwrap_or(0.0)
    }

    /// Highest generation count carrying a strictly non-zero probability.
    #[must_use]
    pub fn last_nonzero_index(&self) -> Option<usize> {
        self.0.iter().rposition(|&p| p > 0.0)
    }

    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Deref for GenerationDistribution {
    type Target = [f64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for GenerationDistribution {
    type Error = RocError;
    fn try_from(pdf: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(pdf)
    }
}

impl Display for GenerationDistribution {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let probs = self.0.iter().map(ToString::to_string).collect::<Vec<_>>();
        write!(f, "[{}]", probs.join(", "))
    }
}
