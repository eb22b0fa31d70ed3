use std::fmt::{self, Display, Formatter};

use statrs::distribution::{DiscreteCDF, Poisson};

use crate::RocError;

/// Mean number of mutations accrued per transmission generation.
///
/// Mutations are modelled as a Poisson process: two cases separated by `g` generations
/// are expected to differ by `g * rate` mutations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MutationRate(f64);

impl MutationRate {
    /// # Errors
    /// - `RocError::InvalidParameter` if `rate` is not strictly positive, or is not finite.
    pub fn new(rate: f64) -> Result<Self, RocError> {
        if ! rate.is_finite() || rate <= 0.0 {
            return Err(RocError::invalid_parameter("mutation_rate", format!("expected a strictly positive, finite rate. Got {rate}")))
        }
        Ok(Self(rate))
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Expected genetic distance between two cases separated by `generations`.
    #[must_use]
    pub fn mean_distance(&self, generations: usize) -> f64 {
        self.0 * generations as f64
    }

    /// Smallest number of mutations `k` such that `P(X <= k) >= p`, with `X ~ Poisson(rate)`.
    ///
    /// # Errors
    /// - `RocError::InvalidParameter` if `p` does not lie within `[0, 1]`
    pub fn quantile(&self, p: f64) -> Result<u64, RocError> {
        if ! (0.0..=1.0).contains(&p) {
            return Err(RocError::invalid_parameter("quantile", format!("probability must lie within [0, 1]. Got {p}")))
        }
        let poisson = Poisson::new(self.0)
            .map_err(|e| RocError::invalid_parameter("mutation_rate", e.to_string()))?;
        Ok(poisson.inverse_cdf(p))
    }
}

impl TryFrom<f64> for MutationRate {
    type Error = RocError;
    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl Display for MutationRate {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_non_positive_rates() {
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = MutationRate::new(rate).unwrap_err();
            assert!(matches!(err, RocError::InvalidParameter{param: "mutation_rate", ..}), "{rate} -> {err}");
        }
    }

    #[test]
    fn mean_distance_scales_with_generations() {
        let rate = MutationRate::new(1.5).unwrap();
        assert_eq!(rate.mean_distance(0), 0.0);
        assert_eq!(rate.mean_distance(4), 6.0);
    }

    #[test]
    fn quantile_unit_rate() {
        // P(X<=4) ~ 0.99634 ; P(X<=5) ~ 0.99941
        let rate = MutationRate::new(1.0).unwrap();
        assert_eq!(rate.quantile(0.999).unwrap(), 5);
    }

    #[test]
    fn quantile_is_smallest_sufficient_count() {
        for lambda in [0.1, 0.5, 2.0, 7.3, 25.0] {
            let rate = MutationRate::new(lambda).unwrap();
            let q = rate.quantile(0.999).unwrap();
            let poisson = Poisson::new(lambda).unwrap();
            assert!(poisson.cdf(q) >= 0.999);
            if q > 0 {
                assert!(poisson.cdf(q - 1) < 0.999);
            }
        }
    }

    #[test]
    fn quantile_rejects_invalid_probability() {
        let rate = MutationRate::new(1.0).unwrap();
        assert!(rate.quantile(1.5).is_err());
        assert!(rate.quantile(-0.1).is_err());
    }
}
