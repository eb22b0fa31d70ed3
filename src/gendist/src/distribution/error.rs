use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistributionError {
    #[error("Failed to model the genetic distance of cases {generations} generation(s) apart (mean distance: {mean}): {reason}")]
    InvalidPoisson{generations: usize, mean: f64, reason: String},

    #[error("The modelled distance range (max-dist = {0}) cannot be held in memory")]
    DistanceRangeTooLarge(u64),
}
