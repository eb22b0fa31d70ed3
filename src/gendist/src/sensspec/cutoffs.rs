use std::ops::Deref;

use crate::RocError;

/// Candidate genetic distance cutoffs: a non-empty, strictly ascending sequence of positive integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cutoffs(Vec<u64>);

impl Cutoffs {
    /// # Errors
    /// - `InvalidParameter` if `cutoffs` is empty or contains a zero.
    /// - `UnsortedCutoffs` if `cutoffs` is not strictly ascending.
    pub fn new(cutoffs: Vec<u64>) -> Result<Self, RocError> {
        if cutoffs.is_empty() {
            return Err(RocError::invalid_parameter("cutoffs", "at least one cutoff is required"))
        }

        if let Some(index) = cutoffs.iter().position(|&c| c == 0) {
            return Err(RocError::invalid_parameter("cutoffs", format!("cutoffs must be positive integers. Found 0 at index {index}")))
        }

        if let Some(index) = cutoffs.windows(2).position(|w| w[0] >= w[1]) {
            return Err(RocError::UnsortedCutoffs{index: index + 1, previous: cutoffs[index], current: cutoffs[index + 1]})
        }
        Ok(Self(cutoffs))
    }

    /// Every cutoff within `1..=max`
    ///
    /// # Errors
    /// - `InvalidParameter` if `max` is zero, or if `max` cutoffs cannot be allocated.
    pub fn up_to(max: u64) -> Result<Self, RocError> {
        let mut cutoffs: Vec<u64> = Vec::new();
        usize::try_from(max).ok()
            .and_then(|len| cutoffs.try_reserve_exact(len).ok())
            .ok_or_else(|| RocError::invalid_parameter("cutoffs", format!("cannot enumerate every cutoff within [1, {max}]")))?;
        cutoffs.extend(1..=max);
        Self::new(cutoffs)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

impl Deref for Cutoffs {
    type Target = [u64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<u64>> for Cutoffs {
    type Error = RocError;
    fn try_from(cutoffs: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(cutoffs)
    }
}
