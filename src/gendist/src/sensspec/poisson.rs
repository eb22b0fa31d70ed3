use indicatif::ProgressBar;
use log::{debug, warn};
use rayon::prelude::*;

use super::{SensSpecEngine, SensSpecError, SensSpecRow};
use crate::{distribution::DistanceDistribution, ResolvedModel};

/// Sensitivity / specificity of a distance cutoff under a Poisson mutation model.
///
/// For a cutoff `c`:
/// - `sensitivity = P(distance <= c | linked)`
/// - `specificity = P(distance >  c | unlinked)`
///
/// Both probabilities are conditioned on the modelled mass, i.e. after truncating generations
/// at `max_gens` and distances at `max_dist` (see [`DistanceDistribution`]).
#[derive(Debug, Default, Clone)]
pub struct PoissonSensSpec {
    progress: Option<ProgressBar>,
}

impl PoissonSensSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick `progress` once per evaluated cutoff.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl SensSpecEngine for PoissonSensSpec {
    fn sensspec(&self, cutoffs: &[u64], model: &ResolvedModel) -> anyhow::Result<Vec<SensSpecRow>> {
        let max_dist = model.max_dist();
        if let Some(&cutoff) = cutoffs.iter().find(|&&cutoff| cutoff > max_dist) {
            return Err(SensSpecError::CutoffOutOfRange{cutoff, max_dist}.into())
        }

        let distribution = DistanceDistribution::new(model).map_err(SensSpecError::from)?;
        let linked_cdf   = distribution.linked_cdf();
        let unlinked_cdf = distribution.unlinked_cdf();

        let linked_mass   = linked_cdf.last().copied().unwrap_or(0.0);
        let unlinked_mass = unlinked_cdf.last().copied().unwrap_or(0.0);
        debug!("Modelled mass: linked={linked_mass:.6} unlinked={unlinked_mass:.6}");

        if linked_mass <= 0.0 {
            return Err(SensSpecError::NoLinkedMass{max_link_gens: model.max_link_gens()}.into())
        }
        if unlinked_mass <= 0.0 {
            return Err(SensSpecError::NoUnlinkedMass{max_link_gens: model.max_link_gens(), max_gens: model.max_gens()}.into())
        }

        let total_mass = model.generation_distribution().total_mass();
        if linked_mass + unlinked_mass < 0.99 * total_mass {
            warn!("More than 1% of the generation distribution's mass lies beyond the modelled bounds \
                (max-gens={}, max-dist={max_dist})", model.max_gens()
            );
        }

        let rows = cutoffs.par_iter()
            .map(|&cutoff| -> anyhow::Result<SensSpecRow> {
                let distance = usize::try_from(cutoff)?;
                let row = SensSpecRow {
                    cutoff,
                    sensitivity: linked_cdf[distance] / linked_mass,
                    specificity: (unlinked_mass - unlinked_cdf[distance]) / unlinked_mass,
                };
                if let Some(progress) = &self.progress {
                    progress.inc(1);
                }
                Ok(row)
            })
            .collect::<anyhow::Result<Vec<SensSpecRow>>>()?;

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenerationDistribution, MutationRate, RocParams};
    use float_cmp::approx_eq;

    fn model(rate: f64, pdf: &[f64], max_link_gens: usize) -> ResolvedModel {
        RocParams::new(MutationRate::new(rate).unwrap(), GenerationDistribution::new(pdf.to_vec()).unwrap())
            .with_max_link_gens(max_link_gens)
            .resolve()
            .unwrap()
    }

    #[test]
    fn known_values() {
        // linked  : 1 generation  -> Poisson(1)
        // unlinked: 2 generations -> Poisson(2)
        let model = model(1.0, &[0.0, 0.6, 0.4], 1);
        let rows  = PoissonSensSpec::new().sensspec(&[1, 2, 3], &model).unwrap();

        assert_eq!(rows.iter().map(|r| r.cutoff).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(approx_eq!(f64, rows[0].sensitivity, 0.735759, epsilon = 1e-5));
        assert!(approx_eq!(f64, rows[0].specificity, 0.593994, epsilon = 1e-4));
        assert!(approx_eq!(f64, rows[1].sensitivity, 0.919699, epsilon = 1e-5));
        assert!(approx_eq!(f64, rows[1].specificity, 0.323324, epsilon = 1e-4));
    }

    #[test]
    fn monotonic_rates() {
        let model = model(0.8, &[0.05, 0.35, 0.3, 0.2, 0.1], 1);
        let cutoffs = (1..=model.max_dist()).collect::<Vec<_>>();
        let rows = PoissonSensSpec::new().sensspec(&cutoffs, &model).unwrap();
        assert!(rows.windows(2).all(|w| w[0].sensitivity <= w[1].sensitivity));
        assert!(rows.windows(2).all(|w| w[0].specificity >= w[1].specificity));
    }

    #[test]
    fn cutoff_at_max_dist_classifies_everything_as_linked() {
        let model = model(1.0, &[0.0, 0.6, 0.4], 1);
        let rows = PoissonSensSpec::new().sensspec(&[model.max_dist()], &model).unwrap();
        assert_eq!(rows[0].sensitivity, 1.0);
        assert_eq!(rows[0].specificity, 0.0);
    }

    #[test]
    fn cutoff_out_of_range() {
        let model = model(1.0, &[0.0, 0.6, 0.4], 1);
        let err = PoissonSensSpec::new().sensspec(&[1, 11], &model).unwrap_err();
        assert!(matches!(err.downcast_ref::<SensSpecError>(), Some(SensSpecError::CutoffOutOfRange{cutoff: 11, max_dist: 10})));
    }

    #[test]
    fn no_unlinked_mass() {
        let model = model(1.0, &[0.0, 0.6, 0.4], 2);
        let err = PoissonSensSpec::new().sensspec(&[1], &model).unwrap_err();
        assert!(matches!(err.downcast_ref::<SensSpecError>(), Some(SensSpecError::NoUnlinkedMass{..})));
    }

    #[test]
    fn no_linked_mass() {
        let model = model(1.0, &[0.0, 0.0, 0.4, 0.6], 1);
        let err = PoissonSensSpec::new().sensspec(&[1], &model).unwrap_err();
        assert!(matches!(err.downcast_ref::<SensSpecError>(), Some(SensSpecError::NoLinkedMass{max_link_gens: 1})));
    }

    #[test]
    fn progress_is_ticked() {
        let model = model(1.0, &[0.0, 0.6, 0.4], 1);
        let progress = ProgressBar::hidden();
        PoissonSensSpec::new().with_progress(progress.clone()).sensspec(&[1, 2, 3, 4], &model).unwrap();
        assert_eq!(progress.position(), 4);
    }
}
