use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use log::info;

use crate::{
    sensspec::{self, Cutoffs, SensSpecEngine, SensSpecRow, RATE_FORMAT_LEN, RATE_PRECISION},
    ResolvedModel, RocError, RocParams,
};

pub const THRESHOLD_FORMAT_LEN: usize = 10;

/// x-coordinate of a ROC point: either a genetic distance cutoff, or one of the two theoretical
/// anchors (`-Inf`: no pair is ever classified as linked ; `+Inf`: every pair is).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Threshold {
    NegInfinity,
    Cutoff(u64),
    PosInfinity,
}

impl Threshold {
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::NegInfinity    => f64::NEG_INFINITY,
            Self::Cutoff(cutoff) => *cutoff as f64,
            Self::PosInfinity    => f64::INFINITY,
        }
    }
}

impl Display for Threshold {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let repr = match self {
            Self::NegInfinity    => "-Inf".to_string(),
            Self::Cutoff(cutoff) => cutoff.to_string(),
            Self::PosInfinity    => "Inf".to_string(),
        };
        // Forward padding, so that callers may align thresholds.
        f.pad(&repr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocPoint {
    pub threshold             : Threshold,
    pub sensitivity           : f64,
    pub specificity_complement: f64,
}

impl RocPoint {
    const LOWER_ANCHOR: Self = Self{threshold: Threshold::NegInfinity, sensitivity: 0.0, specificity_complement: 0.0};
    const UPPER_ANCHOR: Self = Self{threshold: Threshold::PosInfinity, sensitivity: 1.0, specificity_complement: 1.0};

    #[must_use]
    pub fn x(&self) -> f64 {
        self.threshold.as_f64()
    }

    /// Alias of `specificity_complement`
    #[must_use]
    pub fn false_positive_rate(&self) -> f64 {
        self.specificity_complement
    }

    #[must_use]
    pub fn specificity(&self) -> f64 {
        1.0 - self.specificity_complement
    }

    /// Youden's J statistic
    #[must_use]
    pub fn youden_index(&self) -> f64 {
        self.sensitivity - self.specificity_complement
    }

    #[must_use]
    pub fn header() -> String {
        format!("{: <THRESHOLD_FORMAT_LEN$} - {: <RATE_FORMAT_LEN$} - {: <RATE_FORMAT_LEN$}", "Cutoff", "Sensitivity", "1-Specificity")
    }
}

impl From<&SensSpecRow> for RocPoint {
    fn from(row: &SensSpecRow) -> Self {
        Self {
            threshold             : Threshold::Cutoff(row.cutoff),
            sensitivity           : row.sensitivity,
            specificity_complement: 1.0 - row.specificity,
        }
    }
}

impl Display for RocPoint {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{: <THRESHOLD_FORMAT_LEN$} - {: <RATE_FORMAT_LEN$.RATE_PRECISION$} - {: <RATE_FORMAT_LEN$.RATE_PRECISION$}",
            self.threshold, self.sensitivity, self.specificity_complement
        )
    }
}

/// Receiver Operating Characteristic curve of the "distance <= cutoff" linkage classifier.
///
/// # Layout
/// - first point : `(-Inf, sensitivity = 0, 1-specificity = 0)`
/// - one point per cutoff, in ascending cutoff order
/// - last point  : `(+Inf, sensitivity = 1, 1-specificity = 1)`
///
/// Points sharing the same coordinates are all kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    points: Vec<RocPoint>,
}

impl RocCurve {
    /// Convert raw sweep rows into a ROC curve. Specificities are converted into false positive rates,
    /// and the two theoretical corners of the curve are added.
    ///
    /// # Errors
    /// - `UnsortedCutoffs` if `rows` are not in strictly ascending cutoff order.
    pub fn assemble(rows: &[SensSpecRow]) -> Result<Self, RocError> {
        if let Some((index, (prev, next))) = rows.iter().tuple_windows().find_position(|(prev, next)| prev.cutoff >= next.cutoff) {
            return Err(RocError::UnsortedCutoffs{index: index + 1, previous: prev.cutoff, current: next.cutoff})
        }

        let mut points = Vec::with_capacity(rows.len() + 2);
        points.push(RocPoint::LOWER_ANCHOR);
        points.extend(rows.iter().map(RocPoint::from));
        points.push(RocPoint::UPPER_ANCHOR);
        Ok(Self{points})
    }

    #[must_use]
    pub fn points(&self) -> &[RocPoint] {
        &self.points
    }

    /// Points obtained from actual cutoffs, i.e. every point except the two anchors.
    #[must_use]
    pub fn interior(&self) -> &[RocPoint] {
        &self.points[1..self.points.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a curve holds at least its two anchors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RocPoint> {
        self.points.iter()
    }

    /// Area under the curve, using the trapezoidal rule over consecutive points.
    #[must_use]
    pub fn auc(&self) -> f64 {
        self.points.iter()
            .tuple_windows()
            .map(|(a, b)| {
                (b.false_positive_rate() - a.false_positive_rate()) * (a.sensitivity + b.sensitivity) / 2.0
            })
            .sum()
    }

    /// Cutoff maximizing Youden's J statistic (`sensitivity + specificity - 1`). Ties resolve to the smallest cutoff.
    #[must_use]
    pub fn optimal_cutoff(&self) -> Option<&RocPoint> {
        self.interior().iter().fold(None, |best: Option<&RocPoint>, point| match best {
            Some(best) if best.youden_index() >= point.youden_index() => Some(best),
            _ => Some(point),
        })
    }
}

impl<'a> IntoIterator for &'a RocCurve {
    type Item = &'a RocPoint;
    type IntoIter = std::slice::Iter<'a, RocPoint>;
    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl Display for RocCurve {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "{}", RocPoint::header())?;
        self.points.iter().try_for_each(|point| writeln!(f, "{point}"))
    }
}

/// Evaluate the ROC curve of a distance cutoff classifier under an already resolved model.
///
/// # Errors
/// - `CollaboratorFailure` if `engine` fails, or returns an inconsistent sweep.
pub fn roc_curve<E>(cutoffs: &Cutoffs, model: &ResolvedModel, engine: &E) -> Result<RocCurve, RocError>
where
    E: SensSpecEngine + ?Sized,
{
    let rows = sensspec::sweep(engine, cutoffs, model)?;
    let curve = RocCurve::assemble(&rows)?;
    info!("ROC curve assembled over {} cutoff(s). AUC: {:.6}", cutoffs.len(), curve.auc());
    Ok(curve)
}

/// Resolve `params`, sweep `cutoffs` with `engine`, and assemble the resulting ROC curve.
///
/// # Errors
/// - `InvalidDistribution` / `InvalidParameter` if `params` cannot be resolved.
/// - `InvalidParameter` if `cutoffs` is empty, or contains zero.
/// - `UnsortedCutoffs` if `cutoffs` is not strictly ascending.
/// - `CollaboratorFailure` if the engine fails.
pub fn gendist_roc<E>(cutoffs: &[u64], params: &RocParams, engine: &E) -> Result<RocCurve, RocError>
where
    E: SensSpecEngine + ?Sized,
{
    let model   = params.resolve()?;
    let cutoffs = Cutoffs::new(cutoffs.to_vec())?;
    roc_curve(&cutoffs, &model, engine)
}
