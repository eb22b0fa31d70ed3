mod mutation_rate;
pub use mutation_rate::MutationRate;

mod generation_distribution;
pub use generation_distribution::{GenerationDistribution, MASS_TOLERANCE};

mod params;
pub use params::{Bound, RocParams, ResolvedModel, DEFAULT_MAX_LINK_GENS, MAX_DIST_QUANTILE};
