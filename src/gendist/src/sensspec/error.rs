use thiserror::Error;

use crate::distribution::DistributionError;

#[derive(Debug, Error)]
pub enum SensSpecError {
    #[error("Cutoff {cutoff} exceeds the maximum modelled genetic distance ({max_dist}). Consider increasing --max-dist")]
    CutoffOutOfRange{cutoff: u64, max_dist: u64},

    #[error("No probability mass is attributed to linked pairs (at most {max_link_gens} generation(s) apart): sensitivity is undefined")]
    NoLinkedMass{max_link_gens: usize},

    #[error("No probability mass is attributed to unlinked pairs (more than {max_link_gens} and at most {max_gens} generation(s) apart): specificity is undefined")]
    NoUnlinkedMass{max_link_gens: usize, max_gens: usize},

    #[error(transparent)]
    Distribution(#[from] DistributionError),
}
