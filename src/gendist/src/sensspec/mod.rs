use std::fmt::{self, Display, Formatter};

use anyhow::anyhow;
use log::debug;

use crate::{ResolvedModel, RocError};

mod cutoffs;
pub use cutoffs::Cutoffs;

mod poisson;
pub use poisson::PoissonSensSpec;

mod error;
pub use error::SensSpecError;

pub const CUTOFF_FORMAT_LEN: usize = 10;
pub const RATE_FORMAT_LEN  : usize = 12;
pub const RATE_PRECISION   : usize = 6;

/// Classifier performance when declaring pairs as linked whenever their genetic distance is `<= cutoff`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensSpecRow {
    pub cutoff     : u64,
    pub sensitivity: f64,
    pub specificity: f64,
}

impl SensSpecRow {
    #[must_use]
    pub fn header() -> String {
        format!("{: <CUTOFF_FORMAT_LEN$} - {: <RATE_FORMAT_LEN$} - {: <RATE_FORMAT_LEN$}", "Cutoff", "Sensitivity", "Specificity")
    }
}

impl Display for SensSpecRow {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{: <CUTOFF_FORMAT_LEN$} - {: <RATE_FORMAT_LEN$.RATE_PRECISION$} - {: <RATE_FORMAT_LEN$.RATE_PRECISION$}",
            self.cutoff, self.sensitivity, self.specificity
        )
    }
}

/// Sensitivity / specificity engine: for every cutoff, evaluate the distance-cutoff classifier under a resolved model.
///
/// Implementors are expected to be deterministic and free of side effects. They need not return
/// rows in cutoff order: `sweep()` restores it.
#[cfg_attr(test, mockall::automock)]
pub trait SensSpecEngine {
    fn sensspec(&self, cutoffs: &[u64], model: &ResolvedModel) -> anyhow::Result<Vec<SensSpecRow>>;
}

/// Run `engine` over every cutoff, and check that its answer can be turned into a ROC curve.
///
/// # Errors
/// `CollaboratorFailure` if:
/// - the engine fails (the error is carried as-is)
/// - the engine does not return exactly one row per requested cutoff
/// - any sensitivity or specificity lies outside of `[0, 1]`
pub fn sweep<E>(engine: &E, cutoffs: &Cutoffs, model: &ResolvedModel) -> Result<Vec<SensSpecRow>, RocError>
where
    E: SensSpecEngine + ?Sized,
{
    debug!("Sweeping {} cutoff(s) within [{}, {}]", cutoffs.len(), cutoffs[0], cutoffs[cutoffs.len() - 1]);
    let mut rows = engine.sensspec(cutoffs, model).map_err(RocError::CollaboratorFailure)?;

    // Engines may evaluate cutoffs concurrently. Restore a deterministic order.
    rows.sort_by_key(|row| row.cutoff);

    if rows.len() != cutoffs.len() {
        return Err(RocError::CollaboratorFailure(anyhow!(
            "expected {} rows (one per cutoff), but the engine returned {}", cutoffs.len(), rows.len()
        )))
    }

    for (row, &cutoff) in rows.iter().zip(cutoffs.iter()) {
        if row.cutoff != cutoff {
            return Err(RocError::CollaboratorFailure(anyhow!(
                "the engine returned a row for cutoff {} where cutoff {cutoff} was expected", row.cutoff
            )))
        }
        for (name, rate) in [("sensitivity", row.sensitivity), ("specificity", row.specificity)] {
            if ! (0.0..=1.0).contains(&rate) {
                return Err(RocError::CollaboratorFailure(anyhow!(
                    "the engine returned an invalid {name} ({rate}) for cutoff {cutoff}"
                )))
            }
        }
    }
    Ok(rows)
}
