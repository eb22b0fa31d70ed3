use std::fmt::{self, Display, Formatter};

use rayon::prelude::*;
use statrs::distribution::{Discrete, Poisson};
use log::trace;

use crate::ResolvedModel;

mod error;
pub use error::DistributionError;

pub const DISTANCE_FORMAT_LEN: usize = 10;
pub const GENS_FORMAT_LEN    : usize = 12;
pub const PROB_FORMAT_LEN    : usize = 14;

/// Joint probability table of genetic distance and generation count, `P(distance = d, generations = g)`.
///
/// Given `g` generations between two cases, the number of mutations separating them is modelled
/// as `Poisson(g * mutation_rate)` (a point mass at 0 for `g = 0`). Each cell is weighted by the
/// probability of `g` under the generation distribution. Only `g <= max_gens` and `d <= max_dist`
/// are modelled: any mass beyond these bounds is discarded.
#[derive(Debug, Clone)]
pub struct DistanceDistribution {
    max_link_gens: usize,
    max_dist     : u64,
    table        : Vec<Vec<f64>>, // table[generations][distance]
}

impl DistanceDistribution {
    /// Compute the joint distribution. Generation rows are computed in parallel.
    ///
    /// # Errors
    /// - `DistanceRangeTooLarge` if `model.max_dist()` cannot be used as an index, or if a row
    ///   of `max_dist + 1` cells cannot be allocated.
    /// - `InvalidPoisson` if a Poisson distribution cannot be instantiated for a given generation.
    pub fn new(model: &ResolvedModel) -> Result<Self, DistributionError> {
        let num_distances = usize::try_from(model.max_dist()).ok()
            .and_then(|d| d.checked_add(1))
            .ok_or(DistributionError::DistanceRangeTooLarge(model.max_dist()))?;

        let table = (0..=model.max_gens())
            .into_par_iter()
            .map(|generations| Self::generation_row(model, generations, num_distances))
            .collect::<Result<Vec<Vec<f64>>, _>>()?;

        Ok(Self{max_link_gens: model.max_link_gens(), max_dist: model.max_dist(), table})
    }

    fn generation_row(model: &ResolvedModel, generations: usize, num_distances: usize) -> Result<Vec<f64>, DistributionError> {
        let weight = model.generation_distribution().probability(generations);
        let mut row: Vec<f64> = Vec::new();
        row.try_reserve_exact(num_distances)
            .map_err(|_| DistributionError::DistanceRangeTooLarge(model.max_dist()))?;
        row.resize(num_distances, 0.0);
        if weight == 0.0 {
            return Ok(row)
        }

        if generations == 0 {
            row[0] = weight;
            return Ok(row)
        }

        let mean    = model.mutation_rate().mean_distance(generations);
        let poisson = Poisson::new(mean)
            .map_err(|e| DistributionError::InvalidPoisson{generations, mean, reason: e.to_string()})?;

        trace!("Modelling distances for {generations} generation(s): Poisson({mean}), weight={weight}");
        for (distance, cell) in (0u64..).zip(row.iter_mut()) {
            *cell = weight * poisson.pmf(distance);
        }
        Ok(row)
    }

    #[must_use]
    pub fn max_gens(&self) -> usize {
        self.table.len() - 1
    }

    #[must_use]
    pub fn max_dist(&self) -> u64 {
        self.max_dist
    }

    #[must_use]
    pub fn is_linked(&self, generations: usize) -> bool {
        generations <= self.max_link_gens
    }

    /// `P(distance, generations)`. Zero outside of the modelled ranges.
    #[must_use]
    pub fn joint(&self, distance: u64, generations: usize) -> f64 {
        usize::try_from(distance).ok()
            .and_then(|d| self.table.get(generations)?.get(d))
            .copied()
            .unwrap_or(0.0)
    }

    /// Cumulative (un-normalized) probability mass of linked pairs: `out[d] = P(distance <= d, linked)`
    #[must_use]
    pub fn linked_cdf(&self) -> Vec<f64> {
        self.cumulative_mass(true)
    }

    /// Cumulative (un-normalized) probability mass of unlinked pairs: `out[d] = P(distance <= d, unlinked)`
    #[must_use]
    pub fn unlinked_cdf(&self) -> Vec<f64> {
        self.cumulative_mass(false)
    }

    #[must_use]
    pub fn linked_mass(&self) -> f64 {
        self.linked_cdf().last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn unlinked_mass(&self) -> f64 {
        self.unlinked_cdf().last().copied().unwrap_or(0.0)
    }

    fn cumulative_mass(&self, linked: bool) -> Vec<f64> {
        let num_distances = self.table.first().map_or(0, Vec::len);
        let mut mass = vec![0.0; num_distances];
        for (_, row) in self.table.iter().enumerate().filter(|(gens, _)| self.is_linked(*gens) == linked) {
            mass.iter_mut().zip(row).for_each(|(acc, p)| *acc += p);
        }

        let mut running = 0.0;
        for cell in &mut mass {
            running += *cell;
            *cell = running;
        }
        mass
    }

    /// Iterate over every cell of the table, ordered by generation count, then distance.
    pub fn records(&self) -> impl Iterator<Item = DistanceRecord> + '_ {
        self.table.iter().enumerate().flat_map(move |(generations, row)| {
            (0u64..).zip(row).map(move |(distance, &probability)| DistanceRecord {
                distance,
                generations,
                linked: self.is_linked(generations),
                probability
            })
        })
    }
}

/// A single cell of a `DistanceDistribution`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRecord {
    pub distance   : u64,
    pub generations: usize,
    pub linked     : bool,
    pub probability: f64,
}

impl DistanceRecord {
    /// Pretty-printed header, matching the layout of `Display`
    #[must_use]
    pub fn header() -> String {
        format!("{: <DISTANCE_FORMAT_LEN$} - {: <GENS_FORMAT_LEN$} - {: <6} - {: <PROB_FORMAT_LEN$}",
            "Distance", "Generations", "Linked", "Probability"
        )
    }
}

impl Display for DistanceRecord {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{: <DISTANCE_FORMAT_LEN$} - {: <GENS_FORMAT_LEN$} - {: <6} - {: <PROB_FORMAT_LEN$.8e}",
            self.distance, self.generations, self.linked, self.probability
        )
    }
}
