//! Genetic distance cutoffs as classifiers of epidemiological linkage.
//!
//! Given a mutation rate and a distribution of the number of transmission generations separating
//! two sampled cases, this crate evaluates the rule "two cases are linked if their genetic distance
//! is <= cutoff" over a range of cutoffs, and assembles the resulting ROC curve.
//!
//! Pipeline: [`RocParams::resolve()`] -> [`sensspec::sweep()`] -> [`RocCurve::assemble()`].
//! See [`gendist_roc()`].

pub mod error;
pub use error::RocError;

pub mod model;
pub use model::{Bound, GenerationDistribution, MutationRate, ResolvedModel, RocParams};

pub mod distribution;
pub use distribution::{DistanceDistribution, DistanceRecord};

pub mod sensspec;
pub use sensspec::{Cutoffs, PoissonSensSpec, SensSpecEngine, SensSpecRow};

pub mod roc;
pub use roc::{gendist_roc, roc_curve, RocCurve, RocPoint, Threshold};
