use thiserror::Error;

/// Failures of the ROC pipeline (parameter resolution -> sweep -> curve assembly).
///
/// No partial results are ever produced: any of these aborts the whole computation.
#[derive(Debug, Error)]
pub enum RocError {
    #[error("Invalid generation distribution: {0}")]
    InvalidDistribution(String),

    #[error("Invalid value for parameter '{param}': {reason}")]
    InvalidParameter{param: &'static str, reason: String},

    #[error("Cutoffs must be provided in strictly ascending order. Found {current} after {previous} (at index {index})")]
    UnsortedCutoffs{index: usize, previous: u64, current: u64},

    #[error("The sensitivity/specificity engine failed")]
    CollaboratorFailure(#[source] anyhow::Error),
}

impl RocError {
    pub(crate) fn invalid_parameter(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter{param, reason: reason.into()}
    }
}
