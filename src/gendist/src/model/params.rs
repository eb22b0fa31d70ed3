use log::debug;

use super::{GenerationDistribution, MutationRate};
use crate::RocError;

/// Default generation-separation threshold beyond which two cases are labelled as unlinked.
pub const DEFAULT_MAX_LINK_GENS: usize = 1;

/// Poisson quantile used to infer the maximum genetic distance worth modelling.
pub const MAX_DIST_QUANTILE: f64 = 0.999;

/// Upper bound of a modelled range: either explicitly set by the user, or inferred from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound<T> {
    #[default]
    Infer,
    Set(T),
}

impl<T> From<T> for Bound<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T> From<Option<T>> for Bound<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Infer, Self::Set)
    }
}

/// User-facing configuration of a ROC computation.
///
/// # Defaults
/// - `max_link_gens`: [`DEFAULT_MAX_LINK_GENS`]
/// - `max_gens`     : inferred as the last generation carrying a non-zero probability
/// - `max_dist`     : inferred as `max_gens * Poisson(mutation_rate).quantile(MAX_DIST_QUANTILE)`
#[derive(Debug, Clone)]
pub struct RocParams {
    mutation_rate          : MutationRate,
    generation_distribution: GenerationDistribution,
    max_link_gens          : usize,
    max_gens               : Bound<usize>,
    max_dist               : Bound<u64>,
}

impl RocParams {
    #[must_use]
    pub fn new(mutation_rate: MutationRate, generation_distribution: GenerationDistribution) -> Self {
        Self {
            mutation_rate,
            generation_distribution,
            max_link_gens: DEFAULT_MAX_LINK_GENS,
            max_gens     : Bound::Infer,
            max_dist     : Bound::Infer,
        }
    }

    #[must_use]
    pub fn with_max_link_gens(mut self, max_link_gens: usize) -> Self {
        self.max_link_gens = max_link_gens;
        self
    }

    #[must_use]
    pub fn with_max_gens(mut self, max_gens: impl Into<Bound<usize>>) -> Self {
        self.max_gens = max_gens.into();
        self
    }

    #[must_use]
    pub fn with_max_dist(mut self, max_dist: impl Into<Bound<u64>>) -> Self {
        self.max_dist = max_dist.into();
        self
    }

    #[must_use]
    pub fn mutation_rate(&self) -> MutationRate {
        self.mutation_rate
    }

    #[must_use]
    pub fn generation_distribution(&self) -> &GenerationDistribution {
        &self.generation_distribution
    }

    /// Fill in every bound left to `Bound::Infer`.
    ///
    /// # Errors
    /// - `InvalidDistribution` if `max_gens` must be inferred from a distribution without any non-zero probability.
    /// - `InvalidParameter` if any explicit bound is zero, or if the inferred `max_dist` overflows.
    pub fn resolve(&self) -> Result<ResolvedModel, RocError> {
        if self.max_link_gens == 0 {
            return Err(RocError::invalid_parameter("max_link_gens", "must be a positive integer"))
        }

        let max_gens = match self.max_gens {
            Bound::Set(0)        => return Err(RocError::invalid_parameter("max_gens", "must be a positive integer")),
            Bound::Set(max_gens) => max_gens,
            Bound::Infer         => self.generation_distribution.last_nonzero_index()
                .ok_or_else(|| RocError::InvalidDistribution(
                    "cannot infer the maximum number of generations: every probability is zero".to_string()
                ))?,
        };

        let max_dist = match self.max_dist {
            Bound::Set(0)        => return Err(RocError::invalid_parameter("max_dist", "must be a positive integer")),
            Bound::Set(max_dist) => max_dist,
            Bound::Infer         => {
                let quantile = self.mutation_rate.quantile(MAX_DIST_QUANTILE)?;
                u64::try_from(max_gens).ok()
                    .and_then(|gens| gens.checked_mul(quantile))
                    .ok_or_else(|| RocError::invalid_parameter("max_dist", format!(
                        "inferred distance range overflows ({max_gens} generations x {quantile} mutations)"
                    )))?
            },
        };

        debug!("Resolved model bounds: max-link-gens={} max-gens={max_gens} max-dist={max_dist}", self.max_link_gens);
        Ok(ResolvedModel {
            mutation_rate          : self.mutation_rate,
            generation_distribution: self.generation_distribution.clone(),
            max_link_gens          : self.max_link_gens,
            max_gens,
            max_dist,
        })
    }
}

/// Fully resolved model: every bound is concrete. This is what sensitivity/specificity engines receive.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModel {
    mutation_rate          : MutationRate,
    generation_distribution: GenerationDistribution,
    max_link_gens          : usize,
    max_gens               : usize,
    max_dist               : u64,
}

impl ResolvedModel {
    #[must_use]
    pub fn mutation_rate(&self) -> MutationRate {
        self.mutation_rate
    }

    #[must_use]
    pub fn generation_distribution(&self) -> &GenerationDistribution {
        &self.generation_distribution
    }

    #[must_use]
    pub fn max_link_gens(&self) -> usize {
        self.max_link_gens
    }

    #[must_use]
    pub fn max_gens(&self) -> usize {
        self.max_gens
    }

    #[must_use]
    pub fn max_dist(&self) -> u64 {
        self.max_dist
    }

    /// Two cases are considered epidemiologically linked if they lie within `max_link_gens` generations.
    #[must_use]
    pub fn is_linked(&self, generations: usize) -> bool {
        generations <= self.max_link_gens
    }
}
